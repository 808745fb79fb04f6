use guidebook_domain::media::MediaKind;

use crate::domain::port::MediaStorage;
use crate::domain::types::{MediaObject, UploadFile};
use crate::error::PortalError;

pub struct ListMediaUseCase<S>
where
    S: MediaStorage,
{
    pub storage: S,
    pub signed_url_ttl: u64,
}

impl<S> ListMediaUseCase<S>
where
    S: MediaStorage,
{
    /// Unknown media types list the image folder.
    pub async fn execute(&self, media_type: &str) -> Result<Vec<MediaObject>, PortalError> {
        let kind = MediaKind::parse_or_image(media_type);
        self.storage.list(kind.folder(), self.signed_url_ttl).await
    }
}

pub struct UploadMediaUseCase<S>
where
    S: MediaStorage,
{
    pub storage: S,
}

impl<S> UploadMediaUseCase<S>
where
    S: MediaStorage,
{
    /// Unknown media types upload into the material folder. Returns the
    /// public URL.
    pub async fn execute(&self, media_type: &str, file: UploadFile) -> Result<String, PortalError> {
        if file.bytes.is_empty() {
            return Err(PortalError::MissingField("file"));
        }
        let kind = MediaKind::parse_or_material(media_type);
        self.storage.upload(&file, kind.folder(), false).await
    }
}

pub struct DeleteMediaUseCase<S>
where
    S: MediaStorage,
{
    pub storage: S,
}

impl<S> DeleteMediaUseCase<S>
where
    S: MediaStorage,
{
    pub async fn execute(&self, path: &str) -> Result<(), PortalError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(PortalError::MissingField("path"));
        }
        self.storage.delete(path).await
    }

    /// Returns how many paths were submitted for deletion.
    pub async fn execute_batch(&self, paths: Vec<String>) -> Result<usize, PortalError> {
        let paths: Vec<String> = paths
            .into_iter()
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty())
            .collect();
        if paths.is_empty() {
            return Err(PortalError::MissingField("paths"));
        }
        self.storage.delete_batch(&paths).await?;
        Ok(paths.len())
    }
}
