use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use guidebook_session::{
    cookie::{
        PENDING_ACTIVATION_COOKIE, clear_pending_activation_cookie, clear_session_cookie,
        set_pending_activation_cookie, set_session_cookie,
    },
    flash::{Flash, take_flash},
    token::{issue_pending_activation_token, issue_session_token, validate_pending_activation_token},
};

use crate::error::PortalError;
use crate::guard::LOGIN_PATH;
use crate::handlers::{form_failure, redirect_with_flash};
use crate::state::AppState;
use crate::usecase::account::{LoginInput, LoginUseCase};
use crate::usecase::activation::{
    RegisterAccountInput, RegisterAccountUseCase, ValidateActivationCodeUseCase,
};

const ACTIVATE_PATH: &str = "/activate";
const REGISTER_PATH: &str = "/register-account";
const AFTER_LOGIN_PATH: &str = "/guides";

// ── POST /activate ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ActivateForm {
    #[serde(default)]
    pub activation_code: String,
}

pub async fn activate(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ActivateForm>,
) -> Response {
    let usecase = ValidateActivationCodeUseCase {
        codes: state.code_repo(),
    };
    let code = match usecase.execute(&form.activation_code).await {
        Ok(code) => code,
        Err(e) => return form_failure(&state, jar, e, ACTIVATE_PATH),
    };

    let token = match issue_pending_activation_token(&code.code, &state.session_secret) {
        Ok(token) => token,
        Err(e) => return PortalError::Internal(e.into()).into_response(),
    };
    let jar = set_pending_activation_cookie(jar, token, &state.cookie);
    redirect_with_flash(
        &state,
        jar,
        Flash::success("activation code accepted, please create your account"),
        REGISTER_PATH,
    )
}

// ── POST /register-account ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterAccountForm {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register_account(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterAccountForm>,
) -> Response {
    let pending = jar
        .get(PENDING_ACTIVATION_COOKIE)
        .and_then(|c| validate_pending_activation_token(c.value(), &state.session_secret).ok());
    let Some(code) = pending else {
        return redirect_with_flash(
            &state,
            jar,
            Flash::warning("please enter an activation code first"),
            ACTIVATE_PATH,
        );
    };

    let usecase = RegisterAccountUseCase {
        codes: state.code_repo(),
    };
    let input = RegisterAccountInput {
        code,
        phone: form.phone,
        username: form.username,
        password: form.password,
    };
    match usecase.execute(input).await {
        Ok(_) => {
            let jar = clear_pending_activation_cookie(jar, &state.cookie);
            redirect_with_flash(
                &state,
                jar,
                Flash::success("registration complete, please log in"),
                LOGIN_PATH,
            )
        }
        // The code was spent by someone else meanwhile; start over.
        Err(PortalError::InvalidActivationCode) => {
            let jar = clear_pending_activation_cookie(jar, &state.cookie);
            form_failure(&state, jar, PortalError::InvalidActivationCode, ACTIVATE_PATH)
        }
        Err(e) => form_failure(&state, jar, e, REGISTER_PATH),
    }
}

// ── POST /login ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let usecase = LoginUseCase {
        users: state.user_repo(),
    };
    let user = match usecase
        .execute(LoginInput {
            phone: form.phone,
            password: form.password,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => return form_failure(&state, jar, e, LOGIN_PATH),
    };

    let token = match issue_session_token(user.id, &state.session_secret) {
        Ok(token) => token,
        Err(e) => return PortalError::Internal(e.into()).into_response(),
    };
    tracing::info!(user_id = user.id, "logged in");
    let jar = set_session_cookie(jar, token, &state.cookie);
    redirect_with_flash(
        &state,
        jar,
        Flash::success(format!("welcome back, {}", user.username)),
        AFTER_LOGIN_PATH,
    )
}

// ── GET /logout ───────────────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, &state.cookie);
    (jar, Redirect::to("/"))
}

// ── GET /no-permission ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NoPermissionResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub activate_url: &'static str,
}

pub async fn no_permission() -> Json<NoPermissionResponse> {
    Json(NoPermissionResponse {
        status: "error",
        message: "this content requires a paid membership; redeem an activation code to unlock it",
        activate_url: ACTIVATE_PATH,
    })
}

// ── GET /flash ────────────────────────────────────────────────────────────────

pub async fn flash(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = take_flash(jar, &state.cookie);
    (jar, Json(flash))
}
