use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use guidebook_domain::pagination::Page;

use crate::domain::types::Guide;
use crate::error::PortalError;
use crate::handlers::admin::{PageQuery, read_text, read_upload};
use crate::state::AppState;
use crate::usecase::admin_guide::{
    DeleteGuideUseCase, ListAdminGuidesUseCase, SaveGuideInput, SaveGuideUseCase,
};
use crate::usecase::ai_polish::AiPolishUseCase;

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "on" | "true" | "1" | "yes")
}

fn parse_id(value: &str) -> Result<Option<i32>, PortalError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| PortalError::InvalidForm)
}

/// Collect the guide editor's multipart fields.
async fn read_guide_form(mut multipart: Multipart) -> Result<SaveGuideInput, PortalError> {
    let mut input = SaveGuideInput::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| PortalError::InvalidForm)?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "cover_image" => input.cover_file = read_upload(field).await?,
            "title" => input.title = read_text(field).await?,
            "summary" => input.summary = Some(read_text(field).await?),
            "content" => input.content = read_text(field).await?,
            "category_id" => input.category_id = parse_id(&read_text(field).await?)?,
            "cover_image_url" => input.cover_image_url = Some(read_text(field).await?),
            "icon_url" => input.icon_url = Some(read_text(field).await?),
            "audio_url" => input.audio_url = Some(read_text(field).await?),
            "video_url" => input.video_url = Some(read_text(field).await?),
            "is_published" => input.is_published = Some(parse_flag(&read_text(field).await?)),
            "is_featured" => input.is_featured = Some(parse_flag(&read_text(field).await?)),
            "tags" | "tag_ids" => {
                if let Some(id) = parse_id(&read_text(field).await?)? {
                    input.tag_ids.push(id);
                }
            }
            _ => {}
        }
    }
    Ok(input)
}

// ── GET /admin/guides ─────────────────────────────────────────────────────────

pub async fn list_guides(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Guide>>, PortalError> {
    let usecase = ListAdminGuidesUseCase {
        guides: state.guide_repo(),
    };
    Ok(Json(usecase.execute(query.page()).await?))
}

// ── POST /admin/guides ────────────────────────────────────────────────────────

pub async fn create_guide(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Guide>), PortalError> {
    let input = read_guide_form(multipart).await?;
    let usecase = SaveGuideUseCase {
        guides: state.guide_repo(),
        categories: state.category_repo(),
        storage: state.storage.clone(),
    };
    let guide = usecase.execute(None, input).await?;
    Ok((StatusCode::CREATED, Json(guide)))
}

// ── POST /admin/guides/{id} ───────────────────────────────────────────────────

pub async fn update_guide(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<Guide>, PortalError> {
    let input = read_guide_form(multipart).await?;
    let usecase = SaveGuideUseCase {
        guides: state.guide_repo(),
        categories: state.category_repo(),
        storage: state.storage.clone(),
    };
    Ok(Json(usecase.execute(Some(id), input).await?))
}

// ── DELETE /admin/guides/{id} ─────────────────────────────────────────────────

pub async fn delete_guide(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, PortalError> {
    let usecase = DeleteGuideUseCase {
        guides: state.guide_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /admin/guides/ai-polish ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AiPolishRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize)]
pub struct AiPolishResponse {
    pub status: &'static str,
    pub summary: String,
    pub content: String,
}

pub async fn ai_polish(
    State(state): State<AppState>,
    Json(body): Json<AiPolishRequest>,
) -> Result<Json<AiPolishResponse>, PortalError> {
    let usecase = AiPolishUseCase {
        ai: state.ai.clone(),
    };
    let draft = usecase.execute(&body.title).await?;
    Ok(Json(AiPolishResponse {
        status: "success",
        summary: draft.summary,
        content: draft.content,
    }))
}
