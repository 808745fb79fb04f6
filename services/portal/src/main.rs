use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use guidebook_core::config::Config;
use guidebook_core::tracing::init_tracing;
use guidebook_portal::config::PortalConfig;
use guidebook_portal::router::build_router;
use guidebook_portal::state::AppState;
use guidebook_portal_migration::Migrator;

#[tokio::main]
async fn main() {
    init_tracing("info,sqlx=warn");

    let config = PortalConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");

    if config.gemini_api_key.is_none() {
        info!("GEMINI_API_KEY not set, AI drafting disabled");
    }

    let state = AppState::new(db, &config);
    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("portal listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
