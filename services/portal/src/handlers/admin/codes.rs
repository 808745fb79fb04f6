use axum::{
    Form, Json,
    extract::{Query, State},
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use guidebook_domain::pagination::Page;
use guidebook_session::flash::Flash;

use crate::domain::types::{ActivationCode, DEFAULT_CODE_BATCH};
use crate::error::PortalError;
use crate::handlers::admin::PageQuery;
use crate::handlers::{empty_as_none, form_failure, redirect_with_flash};
use crate::state::AppState;
use crate::usecase::codes::{AvailableCodesUseCase, GenerateCodesUseCase, ListCodesUseCase};

const CODES_PATH: &str = "/admin/codes";

// ── GET /admin/codes ──────────────────────────────────────────────────────────

pub async fn list_codes(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ActivationCode>>, PortalError> {
    let usecase = ListCodesUseCase {
        codes: state.code_repo(),
    };
    Ok(Json(usecase.execute(query.page()).await?))
}

// ── POST /admin/codes/generate ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GenerateCodesForm {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub batch: Option<usize>,
}

pub async fn generate_codes(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<GenerateCodesForm>,
) -> Response {
    let usecase = GenerateCodesUseCase {
        codes: state.code_repo(),
    };
    match usecase.execute(form.batch.unwrap_or(DEFAULT_CODE_BATCH)).await {
        Ok(inserted) => redirect_with_flash(
            &state,
            jar,
            Flash::success(format!("generated {} activation codes", inserted.len())),
            CODES_PATH,
        ),
        Err(e) => form_failure(&state, jar, e, CODES_PATH),
    }
}

// ── GET /admin/codes/available ────────────────────────────────────────────────

pub async fn available_codes(State(state): State<AppState>) -> Result<String, PortalError> {
    let usecase = AvailableCodesUseCase {
        codes: state.code_repo(),
    };
    usecase.execute().await
}
