//! Cookie builders for the session and pending-activation tokens.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the logged-in session token.
pub const SESSION_COOKIE: &str = "guidebook_session";

/// Cookie name for the code that passed validation but is not yet redeemed.
pub const PENDING_ACTIVATION_COOKIE: &str = "guidebook_pending_activation";

/// Session JWT lifetime and cookie Max-Age in seconds (7 days).
pub const SESSION_EXP: u64 = 604800;

/// Pending-activation JWT lifetime and cookie Max-Age in seconds (10 minutes).
pub const PENDING_ACTIVATION_EXP: u64 = 600;

/// Attributes shared by every cookie the portal sets.
#[derive(Debug, Clone)]
pub struct CookieOptions {
    pub domain: Option<String>,
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            domain: None,
            secure: true,
        }
    }
}

impl CookieOptions {
    pub(crate) fn build(
        &self,
        name: &'static str,
        value: String,
        max_age: Duration,
    ) -> Cookie<'static> {
        let mut builder = Cookie::build((name, value))
            .path("/")
            .max_age(max_age)
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }
}

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use guidebook_session::cookie::{set_session_cookie, CookieOptions, SESSION_COOKIE};
///
/// let opts = CookieOptions { domain: Some("example.com".to_string()), secure: true };
/// let jar = set_session_cookie(CookieJar::new(), "token_value".to_string(), &opts);
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, opts: &CookieOptions) -> CookieJar {
    jar.add(opts.build(
        SESSION_COOKIE,
        value,
        Duration::seconds(SESSION_EXP as i64),
    ))
}

/// Expire the session cookie.
pub fn clear_session_cookie(jar: CookieJar, opts: &CookieOptions) -> CookieJar {
    jar.add(opts.build(SESSION_COOKIE, String::new(), Duration::ZERO))
}

/// Set the pending-activation cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use guidebook_session::cookie::{
///     set_pending_activation_cookie, CookieOptions, PENDING_ACTIVATION_COOKIE,
/// };
///
/// let jar = set_pending_activation_cookie(CookieJar::new(), "t".to_string(), &CookieOptions::default());
/// let cookie = jar.get(PENDING_ACTIVATION_COOKIE).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(600)));
/// assert_eq!(cookie.domain(), None);
/// ```
pub fn set_pending_activation_cookie(
    jar: CookieJar,
    value: String,
    opts: &CookieOptions,
) -> CookieJar {
    jar.add(opts.build(
        PENDING_ACTIVATION_COOKIE,
        value,
        Duration::seconds(PENDING_ACTIVATION_EXP as i64),
    ))
}

/// Expire the pending-activation cookie.
pub fn clear_pending_activation_cookie(jar: CookieJar, opts: &CookieOptions) -> CookieJar {
    jar.add(opts.build(PENDING_ACTIVATION_COOKIE, String::new(), Duration::ZERO))
}
