pub mod admin;
pub mod auth;
pub mod content;
pub mod profile;

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Deserializer};

use guidebook_session::flash::{Flash, set_flash};

use crate::error::PortalError;
use crate::state::AppState;

/// Flash `flash` and send the browser to `to`.
pub(crate) fn redirect_with_flash(
    state: &AppState,
    jar: CookieJar,
    flash: Flash,
    to: &str,
) -> Response {
    let jar = set_flash(jar, flash, &state.cookie);
    (jar, Redirect::to(to)).into_response()
}

/// Form handlers report user-facing failures as a flash and a redirect back.
/// Internal failures still surface as a JSON error.
pub(crate) fn form_failure(state: &AppState, jar: CookieJar, err: PortalError, back: &str) -> Response {
    match err {
        PortalError::Internal(_) => err.into_response(),
        err => {
            tracing::debug!(kind = err.kind(), "form rejected");
            redirect_with_flash(state, jar, Flash::danger(err.to_string()), back)
        }
    }
}

/// Query/form number that treats an empty string as absent.
pub(crate) fn empty_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
