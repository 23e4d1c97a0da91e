//! Shared harness for the API integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pmo_api::auth::jwt::JwtConfig;
use pmo_api::auth::password::hash_password;
use pmo_api::config::ServerConfig;
use pmo_api::router::build_app_router;
use pmo_api::state::AppState;
use pmo_db::models::user::CreateUser;
use pmo_db::repositories::{RoleRepo, UserRepo};
use pmo_db::PoolSettings;
use pmo_events::EventBus;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password given to every user created with [`create_user`].
pub const TEST_PASSWORD: &str = "test-password-123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_env: "test".to_string(),
        database_url: String::new(),
        pool: PoolSettings::default(),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        password_min_length: 6,
        bootstrap_admin: None,
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with `role` (a role name) and [`TEST_PASSWORD`]. Returns
/// the new id.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    let role = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("role {role} is not seeded"));
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role_id: role.id,
            org_unit_id: None,
        },
    )
    .await
    .unwrap()
    .id
}

/// Log `email` in through the API and return the bearer token.
pub async fn login(app: Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK, "login for {email} failed");
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// Create a user with `role` and return `(user_id, token)`.
pub async fn user_with_token(pool: &PgPool, email: &str, role: &str) -> (i64, String) {
    let id = create_user(pool, email, role).await;
    let token = login(build_test_app(pool.clone()), email).await;
    (id, token)
}

/// Create a project through the API as `token`, led by `lead_id` when given.
/// Returns the new id.
pub async fn create_project(pool: &PgPool, token: &str, code: &str, lead_id: Option<i64>) -> i64 {
    let body = serde_json::json!({
        "name": format!("Project {code}"),
        "code": code,
        "lead_id": lead_id,
        "budget": 1000.0,
    });
    let response =
        post_json_auth(build_test_app(pool.clone()), "/api/v1/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED, "project {code} not created");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
