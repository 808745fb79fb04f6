use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Portal service error variants.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    // ── validation ──
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid form submission")]
    InvalidForm,
    #[error("batch size must be 10 or 20")]
    InvalidBatchSize,
    #[error("feedback status must be 0, 1 or 2")]
    InvalidFeedbackStatus,
    #[error("the Uncategorized category cannot be deleted")]
    ReservedCategory,

    // ── not found ──
    #[error("guide not found")]
    GuideNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("tag not found")]
    TagNotFound,
    #[error("feedback not found")]
    FeedbackNotFound,

    // ── authentication ──
    #[error("invalid phone number or password")]
    InvalidCredentials,

    // ── entitlement conflicts ──
    #[error("invalid or already used activation code")]
    InvalidActivationCode,
    #[error("phone number already registered")]
    PhoneAlreadyRegistered,
    #[error("category already exists")]
    CategoryAlreadyExists,
    #[error("tag already exists")]
    TagAlreadyExists,

    // ── collaborators ──
    #[error("storage error: {0}")]
    Storage(String),
    #[error("AI drafting is not configured")]
    AiUnavailable,
    #[error("AI request failed: {0}")]
    AiRequest(String),
    #[error("AI returned malformed content")]
    AiResponseMalformed,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PortalError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPhone => "INVALID_PHONE",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidForm => "INVALID_FORM",
            Self::InvalidBatchSize => "INVALID_BATCH_SIZE",
            Self::InvalidFeedbackStatus => "INVALID_FEEDBACK_STATUS",
            Self::ReservedCategory => "RESERVED_CATEGORY",
            Self::GuideNotFound => "GUIDE_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::TagNotFound => "TAG_NOT_FOUND",
            Self::FeedbackNotFound => "FEEDBACK_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidActivationCode => "INVALID_ACTIVATION_CODE",
            Self::PhoneAlreadyRegistered => "PHONE_ALREADY_REGISTERED",
            Self::CategoryAlreadyExists => "CATEGORY_ALREADY_EXISTS",
            Self::TagAlreadyExists => "TAG_ALREADY_EXISTS",
            Self::Storage(_) => "STORAGE",
            Self::AiUnavailable => "AI_UNAVAILABLE",
            Self::AiRequest(_) => "AI_REQUEST",
            Self::AiResponseMalformed => "AI_RESPONSE_MALFORMED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPhone
            | Self::MissingField(_)
            | Self::InvalidForm
            | Self::InvalidBatchSize
            | Self::InvalidFeedbackStatus
            | Self::ReservedCategory => StatusCode::BAD_REQUEST,
            Self::GuideNotFound
            | Self::UserNotFound
            | Self::CategoryNotFound
            | Self::TagNotFound
            | Self::FeedbackNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::InvalidActivationCode
            | Self::PhoneAlreadyRegistered
            | Self::CategoryAlreadyExists
            | Self::TagAlreadyExists => StatusCode::CONFLICT,
            Self::Storage(_) | Self::AiRequest(_) | Self::AiResponseMalformed => {
                StatusCode::BAD_GATEWAY
            }
            Self::AiUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sea_orm::DbErr> for PortalError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            }
            Self::Storage(_) | Self::AiRequest(_) | Self::AiResponseMalformed => {
                tracing::warn!(error = %self, kind = self.kind(), "collaborator failure");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "status": "error",
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
