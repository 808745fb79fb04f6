//! Route guards. Each one resolves the session cookie to a [`CurrentUser`]
//! request extension or answers with a `303` redirect.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use guidebook_session::cookie::SESSION_COOKIE;
use guidebook_session::flash::{Flash, set_flash};
use guidebook_session::token::validate_session_token;

use crate::domain::types::User;
use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::account::CurrentUserUseCase;

pub const LOGIN_PATH: &str = "/login";
pub const NO_PERMISSION_PATH: &str = "/no-permission";

/// The signed-in user, inserted by the guards.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| Redirect::to(LOGIN_PATH))
    }
}

async fn resolve_user(state: &AppState, jar: &CookieJar) -> Result<Option<User>, PortalError> {
    let Some(token) = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned()) else {
        return Ok(None);
    };
    let Ok(session) = validate_session_token(&token, &state.session_secret) else {
        return Ok(None);
    };
    let usecase = CurrentUserUseCase {
        users: state.user_repo(),
    };
    match usecase.execute(session.user_id).await {
        Ok(user) => Ok(Some(user)),
        Err(PortalError::UserNotFound) => Ok(None),
        Err(e) => Err(e),
    }
}

fn to_login(state: &AppState, jar: CookieJar) -> Response {
    let jar = set_flash(jar, Flash::info("please log in first"), &state.cookie);
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

// ── require_login ─────────────────────────────────────────────────────────────

pub async fn require_login(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_user(&state, &jar).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Ok(None) => to_login(&state, jar),
        Err(e) => e.into_response(),
    }
}

// ── require_paid ──────────────────────────────────────────────────────────────

pub async fn require_paid(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_user(&state, &jar).await {
        Ok(Some(user)) if user.has_paid_access() => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Ok(Some(_)) => Redirect::to(NO_PERMISSION_PATH).into_response(),
        Ok(None) => to_login(&state, jar),
        Err(e) => e.into_response(),
    }
}

// ── require_admin ─────────────────────────────────────────────────────────────

pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_user(&state, &jar).await {
        Ok(Some(user)) if user.is_admin => {
            req.extensions_mut().insert(CurrentUser(user));
            next.run(req).await
        }
        Ok(Some(user)) => {
            tracing::warn!(user_id = user.id, "non-admin reached the admin console");
            let jar = set_flash(
                jar,
                Flash::danger("you do not have permission to access the admin console"),
                &state.cookie,
            );
            (jar, Redirect::to("/")).into_response()
        }
        Ok(None) => to_login(&state, jar),
        Err(e) => e.into_response(),
    }
}
