use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::Value;

use guidebook_core::config::Config;
use guidebook_portal::config::PortalConfig;
use guidebook_portal::router::build_router;
use guidebook_portal::state::AppState;
use guidebook_portal_schema::{activation_codes, users};
use guidebook_session::cookie::{PENDING_ACTIVATION_COOKIE, SESSION_COOKIE};
use guidebook_session::flash::FLASH_COOKIE;
use guidebook_testing::session::{
    MockSession, TEST_SESSION_SECRET, pending_activation_cookie, set_cookie_value,
};

fn config() -> PortalConfig {
    let pairs = [
        ("DATABASE_URL", "postgres://unused"),
        ("SESSION_SECRET", TEST_SESSION_SECRET),
        ("COOKIE_SECURE", "false"),
        ("OSS_ACCESS_KEY_ID", "id"),
        ("OSS_ACCESS_KEY_SECRET", "secret"),
        ("OSS_BUCKET", "bucket"),
    ];
    PortalConfig::from_pairs(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned())),
    )
    .unwrap()
}

fn server(db: DatabaseConnection) -> TestServer {
    let state = AppState::new(db, &config());
    TestServer::new(build_router(state)).unwrap()
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn user_model(id: i32, is_paid: bool, is_admin: bool) -> users::Model {
    users::Model {
        id,
        phone: format!("1380000{id:04}"),
        username: format!("user{id}"),
        password_hash: "x".to_owned(),
        is_paid,
        is_admin,
        created_at: Utc::now(),
        last_login: None,
    }
}

fn db_with_user(user: users::Model) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user]])
        .into_connection()
}

fn location(res: &axum_test::TestResponse) -> String {
    res.header(header::LOCATION).to_str().unwrap().to_owned()
}

fn cookie_header(name: &str, value: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{name}={value}")).unwrap()
}

#[tokio::test]
async fn should_answer_health_checks() {
    let server = server(empty_db());
    server.get("/healthz").await.assert_status_ok();
}

#[tokio::test]
async fn should_send_anonymous_readers_to_login_with_flash() {
    let server = server(empty_db());

    let res = server.get("/guides").await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");
    let flash = set_cookie_value(res.headers(), FLASH_COOKIE).expect("flash cookie set");
    assert!(!flash.is_empty());

    // The flash endpoint returns the message once and expires the cookie.
    let res = server
        .get("/flash")
        .add_header(header::COOKIE, cookie_header(FLASH_COOKIE, &flash))
        .await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["level"], "info");
    assert_eq!(set_cookie_value(res.headers(), FLASH_COOKIE).as_deref(), Some(""));
}

#[tokio::test]
async fn should_redirect_unpaid_members_to_no_permission() {
    let server = server(db_with_user(user_model(5, false, false)));
    let res = server
        .get("/guide/1")
        .add_header(header::COOKIE, MockSession::new(5).cookie())
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/no-permission");
}

#[tokio::test]
async fn should_redirect_non_admins_home_with_flash() {
    let server = server(db_with_user(user_model(5, true, false)));
    let res = server
        .get("/admin/users")
        .add_header(header::COOKIE, MockSession::new(5).cookie())
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    assert!(set_cookie_value(res.headers(), FLASH_COOKIE).is_some());
}

#[tokio::test]
async fn should_treat_session_of_deleted_user_as_anonymous() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();
    let res = server(db)
        .get("/profile")
        .add_header(header::COOKIE, MockSession::new(77).cookie())
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");
}

#[tokio::test]
async fn should_reject_forged_session_cookie() {
    let res = server(empty_db())
        .get("/profile")
        .add_header(header::COOKIE, cookie_header(SESSION_COOKIE, "not-a-jwt"))
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/login");
}

#[tokio::test]
async fn should_report_ai_unavailable_to_admins() {
    let server = server(db_with_user(user_model(1, true, true)));
    let res = server
        .post("/admin/guides/ai-polish")
        .add_header(header::COOKIE, MockSession::new(1).cookie())
        .json(&serde_json::json!({ "title": "Sleep" }))
        .await;
    assert_eq!(res.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = res.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["kind"], "AI_UNAVAILABLE");
}

#[tokio::test]
async fn should_start_registration_after_valid_code() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![activation_codes::Model {
            id: 1,
            code: "ABC12345".to_owned(),
            is_used: false,
            used_by_username: None,
            created_at: Utc::now(),
        }]])
        .into_connection();
    let res = server(db)
        .post("/activate")
        .form(&[("activation_code", "ABC12345")])
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/register-account");
    let pending = set_cookie_value(res.headers(), PENDING_ACTIVATION_COOKIE).unwrap();
    assert!(!pending.is_empty());
}

#[tokio::test]
async fn should_bounce_invalid_code_back_to_activate() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<activation_codes::Model>::new()])
        .into_connection();
    let res = server(db)
        .post("/activate")
        .form(&[("activation_code", "WRONG000")])
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/activate");
    assert!(set_cookie_value(res.headers(), PENDING_ACTIVATION_COOKIE).is_none());
}

#[tokio::test]
async fn should_require_pending_code_for_registration() {
    let res = server(empty_db())
        .post("/register-account")
        .form(&[
            ("phone", "13800000000"),
            ("username", "reader"),
            ("password", "pw"),
        ])
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/activate");
}

#[tokio::test]
async fn should_flash_invalid_phone_on_registration() {
    let res = server(empty_db())
        .post("/register-account")
        .add_header(header::COOKIE, pending_activation_cookie("ABC12345"))
        .form(&[("phone", "12345"), ("username", "reader"), ("password", "pw")])
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/register-account");
    assert!(set_cookie_value(res.headers(), FLASH_COOKIE).is_some());
    assert!(
        set_cookie_value(res.headers(), PENDING_ACTIVATION_COOKIE).is_none(),
        "pending code survives a validation error"
    );
}

#[tokio::test]
async fn should_clear_session_on_logout() {
    let res = server(empty_db())
        .get("/logout")
        .add_header(header::COOKIE, MockSession::new(1).cookie())
        .await;
    assert_eq!(res.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    assert_eq!(set_cookie_value(res.headers(), SESSION_COOKIE).as_deref(), Some(""));
}

#[tokio::test]
async fn should_explain_paid_requirement() {
    let res = server(empty_db()).get("/no-permission").await;
    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["activate_url"], "/activate");
}
