use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use guidebook_session::cookie::CookieOptions;

use crate::config::PortalConfig;
use crate::infra::db::{
    DbActivationCodeRepository, DbCategoryRepository, DbFavoriteRepository,
    DbFeedbackRepository, DbGuideRepository, DbTagRepository, DbUserRepository,
};
use crate::infra::gemini::GeminiClient;
use crate::infra::oss::OssStorage;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub session_secret: String,
    pub cookie: CookieOptions,
    pub storage: OssStorage,
    pub ai: GeminiClient,
    pub signed_url_ttl: u64,
    /// Body limit for admin upload routes.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &PortalConfig) -> Self {
        Self {
            db: Arc::new(db),
            session_secret: config.session_secret.clone(),
            cookie: config.cookie_options(),
            storage: OssStorage::from_config(config),
            ai: GeminiClient::from_config(config),
            signed_url_ttl: config.signed_url_ttl_secs,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn user_repo(&self) -> DbUserRepository<'_> {
        DbUserRepository { db: &self.db }
    }

    pub fn code_repo(&self) -> DbActivationCodeRepository<'_> {
        DbActivationCodeRepository { db: &self.db }
    }

    pub fn category_repo(&self) -> DbCategoryRepository<'_> {
        DbCategoryRepository { db: &self.db }
    }

    pub fn tag_repo(&self) -> DbTagRepository<'_> {
        DbTagRepository { db: &self.db }
    }

    pub fn guide_repo(&self) -> DbGuideRepository<'_> {
        DbGuideRepository { db: &self.db }
    }

    pub fn favorite_repo(&self) -> DbFavoriteRepository<'_> {
        DbFavoriteRepository { db: &self.db }
    }

    pub fn feedback_repo(&self) -> DbFeedbackRepository<'_> {
        DbFeedbackRepository { db: &self.db }
    }
}

impl FromRef<AppState> for Arc<DatabaseConnection> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.db)
    }
}
