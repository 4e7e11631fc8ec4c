//! Integration tests for authentication headers, rate limiting and health.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use sphere_core::error::DomainError;
use sphere_core::repositories::StoreProbe;
use sphere_infrastructure::InMemoryStore;

use common::{test_config, unique_email, TestApp, PASSWORD};

async fn status_with_header(app: &TestApp, value: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri("/api/users")
        .header(header::AUTHORIZATION, value)
        .body(Body::empty())
        .unwrap();
    let response = app.raw(request).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_missing_authorization_header() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/api/users", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTH_REQUIRED");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_malformed_authorization_headers() {
    let app = TestApp::new();

    let (status, body) = status_with_header(&app, "Basic dXNlcjpwYXNz").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTH_REQUIRED");

    let (status, body) = status_with_header(&app, "Bearer ").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "TOKEN_REQUIRED");

    let (status, body) = status_with_header(&app, "Bearer not.a.token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTH_FAILED");
}

#[tokio::test]
async fn test_token_from_another_secret_is_rejected() {
    let app = TestApp::new();
    let foreign = sphere_security::JwtService::new("some-other-secret", 3600)
        .generate_token(&uuid::Uuid::new_v4(), "x@example.com", &uuid::Uuid::new_v4(), "admin")
        .unwrap();

    let (status, body) = app.request(Method::GET, "/api/users", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTH_FAILED");
}

#[tokio::test]
async fn test_auth_routes_are_rate_limited() {
    let mut config = test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.auth_requests_per_minute = 1;
    config.rate_limit.burst = 2;
    let app = TestApp::with_config(config);

    let login = json!({"email": unique_email(), "password": PASSWORD, "businessCode": "BZZZZZZ"});
    for _ in 0..2 {
        let (status, _) = app
            .request(Method::POST, "/api/auth/login", None, Some(login.clone()))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(login.to_string()))
        .unwrap();
    let response = app.raw(request).await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);

    // Only /api/auth is limited
    let (status, _) = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let response = app.raw(request).await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_ready_with_working_store() {
    let app = TestApp::new();
    let (status, _) = app.request(Method::GET, "/api/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

struct DownProbe;

#[async_trait]
impl StoreProbe for DownProbe {
    async fn ping(&self) -> Result<(), DomainError> {
        Err(DomainError::DatabaseError("connection refused".into()))
    }
}

#[tokio::test]
async fn test_ready_with_unreachable_store() {
    let mut repos = InMemoryStore::new().into_repositories();
    repos.probe = Arc::new(DownProbe);
    let app = TestApp::with_repositories(test_config(), repos);

    let (status, body) = app.request(Method::GET, "/api/health/ready", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "SERVICE_UNAVAILABLE");
    assert!(!body.to_string().contains("refused"));
}
