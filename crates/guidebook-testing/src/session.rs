//! Session helpers for router tests.
//!
//! Routes behind the guards expect a signed `guidebook_session` cookie.
//! `MockSession` signs one with the test secret so no login round-trip is
//! needed.

use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use guidebook_session::cookie::{PENDING_ACTIVATION_COOKIE, SESSION_COOKIE};
use guidebook_session::token::{issue_pending_activation_token, issue_session_token};

/// Secret shared by router tests and the app state they build.
pub const TEST_SESSION_SECRET: &str = "test-session-secret";

/// Identity to present on test requests.
pub struct MockSession {
    pub user_id: i32,
    pub secret: String,
}

impl MockSession {
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            secret: TEST_SESSION_SECRET.to_string(),
        }
    }

    /// `Cookie` header value carrying a valid session token.
    pub fn cookie(&self) -> HeaderValue {
        let token = issue_session_token(self.user_id, &self.secret).unwrap();
        HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}")).unwrap()
    }
}

/// `Cookie` header value carrying a pending-activation token for `code`.
pub fn pending_activation_cookie(code: &str) -> HeaderValue {
    let token = issue_pending_activation_token(code, TEST_SESSION_SECRET).unwrap();
    HeaderValue::from_str(&format!("{PENDING_ACTIVATION_COOKIE}={token}")).unwrap()
}

/// Value of the `name` cookie set by a response, if any.
///
/// An expired (cleared) cookie is reported as `Some("")`.
pub fn set_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            let pair = raw.split(';').next()?;
            let (k, v) = pair.split_once('=')?;
            (k.trim() == name).then(|| v.trim().to_string())
        })
}
