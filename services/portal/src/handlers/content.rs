use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use guidebook_domain::pagination::PageRequest;

use crate::domain::types::GuideFilter;
use crate::error::PortalError;
use crate::guard::CurrentUser;
use crate::handlers::empty_as_none;
use crate::state::AppState;
use crate::usecase::guide::{
    GuideDetail, GuideListing, LikeGuideUseCase, ListGuidesUseCase, ShowGuideUseCase,
};

// ── GET /guides ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListGuidesQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub tag_id: Option<i32>,
    pub q: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u64>,
}

pub async fn list_guides(
    State(state): State<AppState>,
    Query(query): Query<ListGuidesQuery>,
) -> Result<Json<GuideListing>, PortalError> {
    let usecase = ListGuidesUseCase {
        guides: state.guide_repo(),
        categories: state.category_repo(),
        tags: state.tag_repo(),
        storage: state.storage.clone(),
        signed_url_ttl: state.signed_url_ttl,
    };
    let filter = GuideFilter {
        category_id: query.category_id,
        tag_id: query.tag_id,
        q: query.q,
    };
    let listing = usecase
        .execute(filter, PageRequest::new(query.page.unwrap_or(1)))
        .await?;
    Ok(Json(listing))
}

// ── GET /guide/{id} ───────────────────────────────────────────────────────────

pub async fn show_guide(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<GuideDetail>, PortalError> {
    let usecase = ShowGuideUseCase {
        guides: state.guide_repo(),
        categories: state.category_repo(),
        tags: state.tag_repo(),
        favorites: state.favorite_repo(),
        storage: state.storage.clone(),
        signed_url_ttl: state.signed_url_ttl,
    };
    Ok(Json(usecase.execute(id, user.id).await?))
}

// ── POST /like/{id} ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LikeResponse {
    pub status: &'static str,
    pub new_count: i32,
}

pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LikeResponse>, PortalError> {
    let usecase = LikeGuideUseCase {
        guides: state.guide_repo(),
    };
    let new_count = usecase.execute(id).await?;
    Ok(Json(LikeResponse {
        status: "success",
        new_count,
    }))
}
