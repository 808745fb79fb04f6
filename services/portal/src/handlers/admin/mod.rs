//! `/admin` console. Every route here sits behind `require_admin`.

pub mod codes;
pub mod feedback;
pub mod guides;
pub mod media;
pub mod taxonomy;
pub mod users;

use axum::extract::multipart::Field;
use serde::Deserialize;

use guidebook_domain::pagination::PageRequest;

use crate::domain::types::UploadFile;
use crate::error::PortalError;
use crate::handlers::empty_as_none;

#[derive(Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1))
    }
}

/// Read a multipart file part. A part without a file name (nothing chosen in
/// the browser) yields `None`.
pub(crate) async fn read_upload(field: Field<'_>) -> Result<Option<UploadFile>, PortalError> {
    let Some(filename) = field.file_name().map(str::to_owned).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    let content_type = field.content_type().map(str::to_owned);
    let bytes = field.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, "failed to read upload");
        PortalError::InvalidForm
    })?;
    Ok(Some(UploadFile {
        filename,
        content_type,
        bytes,
    }))
}

pub(crate) async fn read_text(field: Field<'_>) -> Result<String, PortalError> {
    field.text().await.map_err(|_| PortalError::InvalidForm)
}
