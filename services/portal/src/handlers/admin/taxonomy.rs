use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::PortalError;
use crate::handlers::empty_as_none;
use crate::state::AppState;
use crate::usecase::taxonomy::{
    CreateCategoryInput, CreateCategoryUseCase, CreateTagUseCase, DeleteCategoryUseCase,
    DeleteTagUseCase, ListTaxonomyUseCase, Taxonomy,
};

// ── GET /admin/taxonomy ───────────────────────────────────────────────────────

pub async fn taxonomy(State(state): State<AppState>) -> Result<Json<Taxonomy>, PortalError> {
    let usecase = ListTaxonomyUseCase {
        categories: state.category_repo(),
        tags: state.tag_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── POST /admin/categories ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort_order: Option<i32>,
}

pub async fn create_category(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, PortalError> {
    let usecase = CreateCategoryUseCase {
        categories: state.category_repo(),
    };
    let created = usecase
        .execute(CreateCategoryInput {
            name: form.name,
            description: form.description,
            icon_url: form.icon_url,
            sort_order: form.sort_order,
        })
        .await?;
    Ok(match created {
        Some(category) => (StatusCode::CREATED, Json(category)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

// ── DELETE /admin/categories/{id} ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct DeleteCategoryResponse {
    pub status: &'static str,
    /// Guides moved onto the reserved category.
    pub moved: u64,
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteCategoryResponse>, PortalError> {
    let usecase = DeleteCategoryUseCase {
        categories: state.category_repo(),
    };
    let moved = usecase.execute(id).await?;
    Ok(Json(DeleteCategoryResponse {
        status: "success",
        moved,
    }))
}

// ── POST /admin/tags ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TagForm {
    #[serde(default)]
    pub name: String,
}

pub async fn create_tag(
    State(state): State<AppState>,
    Form(form): Form<TagForm>,
) -> Result<Response, PortalError> {
    let usecase = CreateTagUseCase {
        tags: state.tag_repo(),
    };
    Ok(match usecase.execute(&form.name).await? {
        Some(tag) => (StatusCode::CREATED, Json(tag)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

// ── DELETE /admin/tags/{id} ───────────────────────────────────────────────────

pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteTagUseCase {
        tags: state.tag_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
