//! Signed JWTs carried in the session and pending-activation cookies.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cookie::{PENDING_ACTIVATION_EXP, SESSION_EXP};

/// Errors returned by the token helpers.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// Claims of the session token.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user id (decimal string) |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
}

/// Claims of the pending-activation token: the validated code, not yet
/// redeemed.
#[derive(Debug, Serialize, Deserialize)]
pub struct PendingActivationClaims {
    pub code: String,
    pub exp: u64,
}

/// Identity recovered from a valid session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfo {
    pub user_id: i32,
    pub exp: u64,
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Encode)
}

// ── Core decode (private) ────────────────────────────────────────────────

/// HS256, exp checked with the default 60s leeway.
fn decode_jwt<C: DeserializeOwned>(
    token: &str,
    secret: &str,
    required: &[&str],
) -> Result<C, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(required);

    let data = decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Session ──────────────────────────────────────────────────────────────

pub fn issue_session_token(user_id: i32, secret: &str) -> Result<String, TokenError> {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: now_secs() + SESSION_EXP,
    };
    sign(&claims, secret)
}

/// Validate a session cookie value, returning the user it belongs to.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionInfo, TokenError> {
    let claims: SessionClaims = decode_jwt(token, secret, &["exp", "sub"])?;
    let user_id = claims
        .sub
        .parse::<i32>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(SessionInfo {
        user_id,
        exp: claims.exp,
    })
}

// ── Pending activation ───────────────────────────────────────────────────

pub fn issue_pending_activation_token(code: &str, secret: &str) -> Result<String, TokenError> {
    let claims = PendingActivationClaims {
        code: code.to_owned(),
        exp: now_secs() + PENDING_ACTIVATION_EXP,
    };
    sign(&claims, secret)
}

/// Validate a pending-activation cookie value, returning the held code.
pub fn validate_pending_activation_token(token: &str, secret: &str) -> Result<String, TokenError> {
    let claims: PendingActivationClaims = decode_jwt(token, secret, &["exp"])?;
    Ok(claims.code)
}
