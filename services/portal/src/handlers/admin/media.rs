use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::{MediaObject, UploadFile};
use crate::error::PortalError;
use crate::handlers::admin::{read_text, read_upload};
use crate::state::AppState;
use crate::usecase::media::{DeleteMediaUseCase, ListMediaUseCase, UploadMediaUseCase};

#[derive(Serialize)]
pub struct MediaActionResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl MediaActionResponse {
    fn success() -> Self {
        Self {
            status: "success",
            url: None,
            count: None,
        }
    }
}

// ── GET /admin/media/{media_type} ─────────────────────────────────────────────

pub async fn list_media(
    State(state): State<AppState>,
    Path(media_type): Path<String>,
) -> Result<Json<Vec<MediaObject>>, PortalError> {
    let usecase = ListMediaUseCase {
        storage: state.storage.clone(),
        signed_url_ttl: state.signed_url_ttl,
    };
    Ok(Json(usecase.execute(&media_type).await?))
}

// ── POST /admin/media/upload ──────────────────────────────────────────────────

pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MediaActionResponse>, PortalError> {
    let mut media_type = String::new();
    let mut file: Option<UploadFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| PortalError::InvalidForm)?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "file" => file = read_upload(field).await?,
            "type" => media_type = read_text(field).await?,
            _ => {}
        }
    }
    let file = file.ok_or(PortalError::MissingField("file"))?;

    let usecase = UploadMediaUseCase {
        storage: state.storage.clone(),
    };
    let url = usecase.execute(&media_type, file).await?;
    Ok(Json(MediaActionResponse {
        url: Some(url),
        ..MediaActionResponse::success()
    }))
}

// ── POST /admin/media/delete ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DeleteMediaRequest {
    #[serde(default)]
    pub path: String,
}

pub async fn delete_media(
    State(state): State<AppState>,
    Json(body): Json<DeleteMediaRequest>,
) -> Result<Json<MediaActionResponse>, PortalError> {
    let usecase = DeleteMediaUseCase {
        storage: state.storage.clone(),
    };
    usecase.execute(&body.path).await?;
    Ok(Json(MediaActionResponse::success()))
}

// ── POST /admin/media/delete-batch ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DeleteMediaBatchRequest {
    #[serde(default)]
    pub paths: Vec<String>,
}

pub async fn delete_media_batch(
    State(state): State<AppState>,
    Json(body): Json<DeleteMediaBatchRequest>,
) -> Result<Json<MediaActionResponse>, PortalError> {
    let usecase = DeleteMediaUseCase {
        storage: state.storage.clone(),
    };
    let count = usecase.execute_batch(body.paths).await?;
    Ok(Json(MediaActionResponse {
        count: Some(count),
        ..MediaActionResponse::success()
    }))
}
