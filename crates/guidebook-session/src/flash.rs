//! One-shot flash messages stored in a cookie until the client reads them.

use axum_extra::extract::cookie::CookieJar;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::cookie::CookieOptions;

pub const FLASH_COOKIE: &str = "guidebook_flash";

/// Flash cookie Max-Age in seconds.
pub const FLASH_EXP: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }

    fn encode(&self) -> String {
        // Serializing two plain fields cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Store `flash` on the jar, replacing any unread one.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use guidebook_session::cookie::CookieOptions;
/// use guidebook_session::flash::{set_flash, take_flash, Flash};
///
/// let opts = CookieOptions::default();
/// let jar = set_flash(CookieJar::new(), Flash::success("saved"), &opts);
/// let (_jar, flash) = take_flash(jar, &opts);
/// assert_eq!(flash, Some(Flash::success("saved")));
/// ```
pub fn set_flash(jar: CookieJar, flash: Flash, opts: &CookieOptions) -> CookieJar {
    jar.add(opts.build(FLASH_COOKIE, flash.encode(), Duration::seconds(FLASH_EXP)))
}

/// Read and expire the flash cookie.
///
/// An undecodable cookie is dropped and reported as no message.
pub fn take_flash(jar: CookieJar, opts: &CookieOptions) -> (CookieJar, Option<Flash>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_owned()) else {
        return (jar, None);
    };
    let flash = Flash::decode(&raw);
    if flash.is_none() && !raw.is_empty() {
        tracing::debug!("discarding undecodable flash cookie");
    }
    let jar = jar.add(opts.build(FLASH_COOKIE, String::new(), Duration::ZERO));
    (jar, flash)
}
