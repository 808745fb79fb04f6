#![allow(async_fn_in_trait)]

use crate::domain::types::{MediaObject, UploadFile};
use crate::error::PortalError;
use crate::markdown::StorageLinks;

/// Object store holding guide covers and media-center assets.
pub trait MediaStorage: Send + Sync {
    /// Store `file` under `folder` with a fresh unique name.
    ///
    /// Public uploads return the full public URL; private ones the object key.
    async fn upload(
        &self,
        file: &UploadFile,
        folder: &str,
        private: bool,
    ) -> Result<String, PortalError>;

    /// Time-limited GET URL for an object URL or key. Already-signed URLs,
    /// URLs on other hosts and empty input come back unchanged.
    fn sign(&self, url_or_path: &str, ttl_secs: u64) -> String;

    /// Matcher for this store's object URLs inside free text.
    fn links(&self) -> &StorageLinks;

    /// Objects under `prefix`, newest first, directory placeholders skipped.
    async fn list(&self, prefix: &str, ttl_secs: u64) -> Result<Vec<MediaObject>, PortalError>;

    async fn delete(&self, path: &str) -> Result<(), PortalError>;

    async fn delete_batch(&self, paths: &[String]) -> Result<(), PortalError>;
}

/// Generative-text service used for drafting guides.
pub trait TextGenerator: Send + Sync {
    /// Fails with `AiUnavailable` when no credentials are configured.
    async fn complete(&self, prompt: &str) -> Result<String, PortalError>;
}
