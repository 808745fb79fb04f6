use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;

use guidebook_domain::pagination::Page;

use crate::domain::types::{DashboardStats, User};
use crate::error::PortalError;
use crate::handlers::admin::PageQuery;
use crate::state::AppState;
use crate::usecase::users::{DashboardUseCase, ListMembersUseCase, TogglePaidUseCase};

// ── GET /admin ────────────────────────────────────────────────────────────────

pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, PortalError> {
    let usecase = DashboardUseCase {
        users: state.user_repo(),
        guides: state.guide_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── GET /admin/users ──────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<User>>, PortalError> {
    let usecase = ListMembersUseCase {
        users: state.user_repo(),
    };
    Ok(Json(usecase.execute(query.page()).await?))
}

// ── POST /admin/users/{id}/authorize ──────────────────────────────────────────

#[derive(Serialize)]
pub struct AuthorizeResponse {
    pub status: &'static str,
    pub is_paid: bool,
}

pub async fn authorize_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AuthorizeResponse>, PortalError> {
    let usecase = TogglePaidUseCase {
        users: state.user_repo(),
    };
    let is_paid = usecase.execute(id).await?;
    Ok(Json(AuthorizeResponse {
        status: "success",
        is_paid,
    }))
}
