use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};

use guidebook_core::health::{healthz, readyz};
use guidebook_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::guard::{require_admin, require_login, require_paid};
use crate::handlers::{
    admin::{codes, feedback, guides, media, taxonomy, users},
    auth::{activate, flash, login, logout, no_permission, register_account},
    content::{like, list_guides, show_guide},
    profile::{favorite, profile, submit_feedback},
};
use crate::state::AppState;

fn admin_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(users::dashboard))
        // Members
        .route("/users", get(users::list_users))
        .route("/users/{id}/authorize", post(users::authorize_user))
        // Activation codes
        .route("/codes", get(codes::list_codes))
        .route("/codes/generate", post(codes::generate_codes))
        .route("/codes/available", get(codes::available_codes))
        // Taxonomy
        .route("/taxonomy", get(taxonomy::taxonomy))
        .route("/categories", post(taxonomy::create_category))
        .route("/categories/{id}", delete(taxonomy::delete_category))
        .route("/tags", post(taxonomy::create_tag))
        .route("/tags/{id}", delete(taxonomy::delete_tag))
        // Guides
        .route("/guides", get(guides::list_guides).post(guides::create_guide))
        .route("/guides/ai-polish", post(guides::ai_polish))
        .route(
            "/guides/{id}",
            post(guides::update_guide).delete(guides::delete_guide),
        )
        // Feedback
        .route("/feedback", get(feedback::list_feedback))
        .route(
            "/feedback/{id}/status/{status}",
            post(feedback::update_feedback_status),
        )
        // Media center
        .route("/media/upload", post(media::upload_media))
        .route("/media/delete", post(media::delete_media))
        .route("/media/delete-batch", post(media::delete_media_batch))
        .route("/media/{media_type}", get(media::list_media))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

pub fn build_router(state: AppState) -> Router {
    let member = Router::new()
        .route("/favorite/{id}", post(favorite))
        .route("/profile", get(profile))
        .route("/feedback", post(submit_feedback))
        .route_layer(from_fn_with_state(state.clone(), require_login));

    let paid = Router::new()
        .route("/guides", get(list_guides))
        .route("/guide/{id}", get(show_guide))
        .route_layer(from_fn_with_state(state.clone(), require_paid));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Entitlement
        .route("/activate", post(activate))
        .route("/register-account", post(register_account))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/no-permission", get(no_permission))
        .route("/flash", get(flash))
        // Reader
        .route("/like/{id}", post(like))
        .merge(member)
        .merge(paid)
        .nest("/admin", admin_router(&state))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
