use axum::{
    Form, Json,
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use guidebook_session::flash::Flash;

use crate::domain::types::FavoriteAction;
use crate::error::PortalError;
use crate::guard::CurrentUser;
use crate::handlers::{form_failure, redirect_with_flash};
use crate::state::AppState;
use crate::usecase::favorite::{Profile, ProfileUseCase, ToggleFavoriteUseCase};
use crate::usecase::feedback::{SubmitFeedbackInput, SubmitFeedbackUseCase};

// ── POST /favorite/{id} ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FavoriteResponse {
    pub status: &'static str,
    pub action: FavoriteAction,
}

pub async fn favorite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<FavoriteResponse>, PortalError> {
    let usecase = ToggleFavoriteUseCase {
        guides: state.guide_repo(),
        favorites: state.favorite_repo(),
    };
    let action = usecase.execute(user.id, id).await?;
    Ok(Json(FavoriteResponse {
        status: "success",
        action,
    }))
}

// ── GET /profile ──────────────────────────────────────────────────────────────

pub async fn profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Profile>, PortalError> {
    let usecase = ProfileUseCase {
        favorites: state.favorite_repo(),
        storage: state.storage.clone(),
        signed_url_ttl: state.signed_url_ttl,
    };
    Ok(Json(usecase.execute(user).await?))
}

// ── POST /feedback ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub content: String,
    pub contact: Option<String>,
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Form(form): Form<FeedbackForm>,
) -> Response {
    let usecase = SubmitFeedbackUseCase {
        feedbacks: state.feedback_repo(),
    };
    let input = SubmitFeedbackInput {
        content: form.content,
        contact: form.contact,
        user_id: Some(user.id),
    };
    match usecase.execute(input).await {
        Ok(_) => redirect_with_flash(
            &state,
            jar,
            Flash::success("feedback submitted, thank you"),
            "/profile",
        ),
        Err(e) => form_failure(&state, jar, e, "/feedback"),
    }
}
