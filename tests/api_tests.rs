//! API integration tests
//!
//! Every test drives the full router (extractors, handlers, services,
//! repository) against its own in-memory SQLite database.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use ludotheca_server::{
    api,
    config::{AppConfig, AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig},
    repository::Repository,
    services::Services,
    AppState,
};

/// Build a router backed by a fresh in-memory database.
///
/// A single pooled connection keeps every query on the same in-memory
/// database.
async fn test_app() -> Router {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid database URL")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    let repository = Repository::new(pool);
    repository
        .init_schema()
        .await
        .expect("Failed to initialize schema");

    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig::default(),
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 72,
        },
        logging: LoggingConfig::default(),
    };

    let services = Services::new(repository, config.auth.clone());

    api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

/// Send a request and return (status, parsed JSON body)
async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}

/// Register a user and return their login token
async fn register_and_login(app: &Router, name: &str, email: &str, password: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"name": name, "email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a resource and return its ID
async fn create_resource(app: &Router, title: &str, kind: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/resources",
        None,
        Some(json!({"title": title, "type": kind})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("No resource ID")
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_then_duplicate_conflict() {
    let app = test_app().await;

    let payload = json!({
        "name": "Test User",
        "email": "test@example.com",
        "password": "password123"
    });

    let (status, body) = send(&app, "POST", "/api/v1/register", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"]["id"].as_i64().unwrap() > 0);
    assert_eq!(body["user"]["email"], "test@example.com");
    // The password hash must never be serialized
    assert!(body["user"].get("password").is_none());

    let (status, _) = send(&app, "POST", "/api/v1/register", None, Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation_failures() {
    let app = test_app().await;

    // Password too short
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"name": "A", "email": "a@example.com", "password": "short"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Malformed email
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"name": "A", "email": "not-an-email", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing field
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"email": "a@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_success_returns_token_without_password() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"name": "Test User", "email": "test@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"email": "test@example.com", "password": "password123"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["name"], "Test User");
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_login_failures_are_unauthorized() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"name": "Test User", "email": "test@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Wrong password for an existing email
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"email": "test@example.com", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown email gets the same answer
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"email": "nobody@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_requires_authentication() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/v1/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/api/v1/profile", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_get_and_update() {
    let app = test_app().await;
    let token = register_and_login(&app, "Test User", "test@example.com", "password123").await;

    let (status, body) = send(&app, "GET", "/api/v1/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["email"], "test@example.com");
    assert!(body.get("password").is_none());

    let (status, body) = send(
        &app,
        "PUT",
        "/api/v1/profile",
        Some(&token),
        Some(json!({"name": "Renamed User", "email": "renamed@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed User");
    assert_eq!(body["email"], "renamed@example.com");

    // Keeping your own email is not a conflict
    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/profile",
        Some(&token),
        Some(json!({"name": "Renamed User", "email": "renamed@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_update_conflicts_with_other_users_email() {
    let app = test_app().await;
    let token = register_and_login(&app, "User A", "a@example.com", "password123").await;
    register_and_login(&app, "User B", "b@example.com", "password123").await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/profile",
        Some(&token),
        Some(json!({"name": "User A", "email": "b@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_resource_create_and_get() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/resources",
        None,
        Some(json!({"title": "Test Book", "type": "book", "status": "available"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(body["title"], "Test Book");
    assert_eq!(body["type"], "book");
    assert_eq!(body["status"], "available");

    let (status, body) = send(&app, "GET", &format!("/api/v1/resources/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);

    let (status, body) = send(&app, "GET", "/api/v1/resources", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_resource_status_defaults_to_available() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/resources",
        None,
        Some(json!({"title": "Catan", "type": "game"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "available");
}

#[tokio::test]
async fn test_resource_not_found() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/v1/resources/999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", "/api/v1/resources/999/disable", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resource_enable_disable_toggle() {
    let app = test_app().await;
    let id = create_resource(&app, "Risk", "game").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/resources/{}/disable", id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "disabled");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/resources/{}/enable", id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "available");
}

#[tokio::test]
async fn test_fill_seeds_demo_data_once() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/resources/fill", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let added = body["added"].as_u64().unwrap();
    assert!(added > 0);

    // Second fill finds every title already present
    let (status, body) = send(&app, "GET", "/api/v1/resources/fill", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added"].as_u64().unwrap(), 0);

    let (status, body) = send(&app, "GET", "/api/v1/resources", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len() as u64, added);
}

#[tokio::test]
async fn test_loans_require_authentication() {
    let app = test_app().await;

    let (status, _) = send(&app, "GET", "/api/v1/loans", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans",
        None,
        Some(json!({"resource_id": 1, "borrow_type": "take_away"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_loan_unknown_resource_not_found() {
    let app = test_app().await;
    let token = register_and_login(&app, "Test User", "test@example.com", "password123").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({"resource_id": 999, "borrow_type": "take_away"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_loan_on_disabled_resource_conflicts() {
    let app = test_app().await;
    let token = register_and_login(&app, "Test User", "test@example.com", "password123").await;
    let id = create_resource(&app, "Dracula", "book").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/resources/{}/disable", id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({"resource_id": id, "borrow_type": "take_away"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_in_place_loan_has_no_due_date() {
    let app = test_app().await;
    let token = register_and_login(&app, "Test User", "test@example.com", "password123").await;
    let id = create_resource(&app, "The Crew", "game").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({"resource_id": id, "borrow_type": "in_place"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["return_date"].is_null());
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn test_return_loan_by_other_user_is_forbidden() {
    let app = test_app().await;
    let token_a = register_and_login(&app, "User A", "a@example.com", "password123").await;
    let token_b = register_and_login(&app, "User B", "b@example.com", "password123").await;
    let id = create_resource(&app, "Splendor", "game").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token_a),
        Some(json!({"resource_id": id, "borrow_type": "take_away"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = body["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/loans/{}/return", loan_id),
        Some(&token_b),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_full_loan_lifecycle() {
    let app = test_app().await;

    // Register, duplicate register, login
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"name": "Test User", "email": "test@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/register",
        None,
        Some(json!({"name": "Test User", "email": "test@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/login",
        None,
        Some(json!({"email": "test@example.com", "password": "password123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    // Create a resource and borrow it
    let resource_id = create_resource(&app, "Test Book", "book").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({"resource_id": resource_id, "borrow_type": "take_away"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = body["id"].as_i64().unwrap();
    assert_eq!(body["status"], "active");

    // Take-away due date is ~15 days out
    let return_date =
        DateTime::parse_from_rfc3339(body["return_date"].as_str().unwrap()).unwrap();
    let days_out = (return_date.with_timezone(&Utc) - Utc::now()).num_days();
    assert!((14..=15).contains(&days_out));

    // Resource is now borrowed; borrowing it again conflicts
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/resources/{}", resource_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "borrowed");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({"resource_id": resource_id, "borrow_type": "take_away"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The loan shows up in the user's list
    let (status, body) = send(&app, "GET", "/api/v1/loans", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], loan_id);

    // Return it
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/loans/{}/return", loan_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "returned");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/resources/{}", resource_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "available");

    // Returning twice conflicts
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/loans/{}/return", loan_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_return_keeps_disabled_resource_disabled() {
    let app = test_app().await;
    let token = register_and_login(&app, "Test User", "test@example.com", "password123").await;
    let id = create_resource(&app, "Agricola", "game").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({"resource_id": id, "borrow_type": "take_away"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = body["id"].as_i64().unwrap();

    // An admin pulls the resource from circulation while it is on loan
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/resources/{}/disable", id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/loans/{}/return", loan_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/api/v1/resources/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "disabled");
}

#[tokio::test]
async fn test_malformed_loan_body_is_bad_request() {
    let app = test_app().await;
    let token = register_and_login(&app, "Test User", "test@example.com", "password123").await;

    // Unknown borrow type
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({"resource_id": 1, "borrow_type": "forever"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing resource_id
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(&token),
        Some(json!({"borrow_type": "take_away"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
