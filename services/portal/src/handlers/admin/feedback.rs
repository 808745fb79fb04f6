use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use guidebook_domain::feedback::FeedbackStatus;
use guidebook_domain::pagination::Page;

use crate::domain::types::Feedback;
use crate::error::PortalError;
use crate::handlers::admin::PageQuery;
use crate::state::AppState;
use crate::usecase::feedback::{ListFeedbackUseCase, UpdateFeedbackStatusUseCase};

// ── GET /admin/feedback ───────────────────────────────────────────────────────

pub async fn list_feedback(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Feedback>>, PortalError> {
    let usecase = ListFeedbackUseCase {
        feedbacks: state.feedback_repo(),
    };
    Ok(Json(usecase.execute(query.page()).await?))
}

// ── POST /admin/feedback/{id}/status/{status} ─────────────────────────────────

#[derive(Serialize)]
pub struct FeedbackStatusResponse {
    pub status: &'static str,
    pub feedback_status: FeedbackStatus,
}

pub async fn update_feedback_status(
    State(state): State<AppState>,
    Path((id, status)): Path<(i32, i16)>,
) -> Result<Json<FeedbackStatusResponse>, PortalError> {
    let usecase = UpdateFeedbackStatusUseCase {
        feedbacks: state.feedback_repo(),
    };
    let feedback_status = usecase.execute(id, status).await?;
    Ok(Json(FeedbackStatusResponse {
        status: "success",
        feedback_status,
    }))
}
