//! Route-level tests over an in-process server.
//!
//! The pool is built lazily, so nothing here needs a running MySQL:
//! auth, validation and error mapping are all decided before any
//! connection would be opened.

use std::fs;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use sqlstudio::{config::StudioConfig, create_router, state::AppState};
use sqlstudio_auth::{AuditLog, AuthGate, RateLimitConfig, RateLimiter, SharedSecret};
use sqlx::mysql::MySqlPoolOptions;
use tempfile::TempDir;

const SECRET: &str = "admin123";

fn test_state(dir: &TempDir) -> AppState {
    let config = StudioConfig {
        admin_secret: SECRET.to_string(),
        // A port nothing listens on: any route that actually touches the
        // database must fail, which the error-mapping test relies on.
        mysql_port: 3310,
        audit_log: dir.path().join("login.txt"),
        ..StudioConfig::default()
    };

    let audit = AuditLog::open(&config.audit_log).unwrap();
    let gate = AuthGate::new(
        SharedSecret::new(config.admin_secret.clone()),
        RateLimiter::new(RateLimitConfig {
            max_attempts: config.login_max_attempts,
            window: config.login_window,
        }),
        audit,
    );

    let pool = MySqlPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(&config.mysql_url())
        .unwrap();

    AppState::new(pool, gate, config)
}

fn server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).unwrap()
}

fn from_ip(ip: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-forwarded-for"),
        HeaderValue::from_static(ip),
    )
}

fn admin_key() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-admin-key"),
        HeaderValue::from_static(SECRET),
    )
}

fn audit_lines(dir: &TempDir) -> Vec<String> {
    fs::read_to_string(dir.path().join("login.txt"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn login_with_correct_secret_returns_token() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));
    let (name, value) = from_ip("10.0.0.1");

    let response = server
        .post("/login")
        .add_header(name, value)
        .json(&json!({ "secret": SECRET }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["token"], json!(SECRET));

    let lines = audit_lines(&dir);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("10.0.0.1   success"));
}

#[tokio::test]
async fn login_with_wrong_secret_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));
    let (name, value) = from_ip("10.0.0.2");

    let response = server
        .post("/login")
        .add_header(name, value)
        .json(&json!({ "secret": "wrong" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("INVALID_SECRET"));

    let lines = audit_lines(&dir);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("10.0.0.2   failed"));
}

#[tokio::test]
async fn fourth_login_attempt_is_throttled() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));

    for _ in 0..3 {
        let (name, value) = from_ip("10.0.0.3");
        let response = server
            .post("/login")
            .add_header(name, value)
            .json(&json!({ "secret": "wrong" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    let (name, value) = from_ip("10.0.0.3");
    let response = server
        .post("/login")
        .add_header(name, value)
        .json(&json!({ "secret": SECRET }))
        .await;

    assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("TOO_MANY_ATTEMPTS"));

    // Throttled attempts are not audited; only the three verified ones.
    assert_eq!(audit_lines(&dir).len(), 3);
}

#[tokio::test]
async fn throttling_does_not_leak_across_addresses() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));

    for _ in 0..3 {
        let (name, value) = from_ip("10.0.0.4");
        server
            .post("/login")
            .add_header(name, value)
            .json(&json!({ "secret": "wrong" }))
            .await;
    }

    let (name, value) = from_ip("10.0.0.5");
    let response = server
        .post("/login")
        .add_header(name, value)
        .json(&json!({ "secret": SECRET }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn missing_admin_key_is_rejected_before_any_database_call() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));

    // No X-Admin-Key: the middleware rejects instantly. Were a database
    // call attempted, the unreachable pool would yield 503 instead.
    let response = server.get("/databases").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("UNAUTHORIZED"));
}

#[tokio::test]
async fn invalid_admin_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));

    let response = server
        .get("/databases")
        .add_header(
            HeaderName::from_static("x-admin-key"),
            HeaderValue::from_static("not-the-secret"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unreachable_database_maps_to_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));
    let (name, value) = admin_key();

    let response = server.get("/databases").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("DATABASE_ERROR"));
}

#[tokio::test]
async fn invalid_database_name_fails_validation_without_touching_mysql() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));
    let (name, value) = admin_key();

    let response = server
        .post("/databases")
        .add_header(name, value)
        .json(&json!({ "name": "bad-name!" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], json!("INVALID_REQUEST"));
}

#[tokio::test]
async fn system_databases_cannot_be_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));
    let (name, value) = admin_key();

    let response = server.delete("/databases/mysql").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forbidden_filter_keywords_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));
    let (name, value) = admin_key();

    let response = server
        .get("/databases/app/tables/users/data")
        .add_query_param("filter", "1=1; DROP TABLE users")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn page_size_is_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));
    let (name, value) = admin_key();

    let response = server
        .get("/databases/app/tables/users/data")
        .add_query_param("page_size", "5000")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_sql_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));
    let (name, value) = admin_key();

    let response = server
        .post("/query")
        .add_header(name, value)
        .json(&json!({ "sql": "   " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn audit_endpoint_lists_recent_logins() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(test_state(&dir));

    let (name, value) = from_ip("10.0.0.6");
    server
        .post("/login")
        .add_header(name, value)
        .json(&json!({ "secret": SECRET }))
        .await;

    let (name, value) = admin_key();
    let response = server.get("/audit").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["count"], json!(1));
    let entry = body["entries"][0].as_str().unwrap();
    assert!(entry.contains("10.0.0.6"));
    assert!(entry.ends_with("success"));
}
