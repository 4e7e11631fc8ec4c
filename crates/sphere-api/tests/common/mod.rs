//! Shared harness for the HTTP integration tests.
//!
//! Every [`TestApp`] owns a fresh in-memory store, so tests never share data.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::Fake;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use sphere_api::{build_router, AppState};
use sphere_core::Repositories;
use sphere_infrastructure::InMemoryStore;
use sphere_shared::config::{AppConfig, DatabaseBackend};

pub const PASSWORD: &str = "Secret1!x";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::defaults().expect("default config");
    config.app.env = "test".into();
    config.database.backend = DatabaseBackend::Memory;
    config.security.bcrypt_cost = 4;
    config.rate_limit.enabled = false;
    config
}

pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{}", &Uuid::new_v4().simple().to_string()[..8], email)
}

/// Syntactically valid address that is longer than the 255 characters
/// the users table stores.
pub fn overlong_email() -> String {
    let label = "d".repeat(60);
    format!("{}@{}.{}.{}.{}.com", "l".repeat(64), label, label, label, label)
}

pub fn username() -> String {
    let name: String = Username().fake();
    format!("{}_{}", name.chars().take(40).collect::<String>(), "u")
}

/// Identity returned by one of the auth endpoints.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub business_id: String,
    pub business_code: String,
    pub email: String,
    pub role: String,
}

impl Session {
    fn from_body(body: &Value, email: &str) -> Self {
        Self {
            token: body["token"].as_str().expect("token").to_string(),
            user_id: body["user"]["id"].as_str().expect("user id").to_string(),
            business_id: body["business"]["id"].as_str().expect("business id").to_string(),
            business_code: body["business"]["businessCode"]
                .as_str()
                .expect("business code")
                .to_string(),
            email: email.to_lowercase(),
            role: body["user"]["role"].as_str().expect("role").to_string(),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = InMemoryStore::new();
        let router = build_router(AppState::new(config, store.clone().into_repositories()));
        Self { router, store }
    }

    pub fn with_repositories(config: AppConfig, repos: Repositories) -> Self {
        Self {
            router: build_router(AppState::new(config, repos)),
            store: InMemoryStore::new(),
        }
    }

    pub async fn raw(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.expect("infallible router")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        let response = self.raw(request).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn create_business(&self) -> Session {
        let email = unique_email();
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/business/create",
                None,
                Some(json!({
                    "businessName": "Sphere Inc.",
                    "email": email,
                    "password": PASSWORD,
                    "username": username(),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create business: {}", body);
        Session::from_body(&body, &email)
    }

    /// Issue an invitation and return its code.
    pub async fn invite(&self, admin: &Session, email: &str, role: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/users/invite",
                Some(&admin.token),
                Some(json!({ "email": email, "role": role })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "invite: {}", body);
        body["invitationCode"].as_str().expect("code").to_string()
    }

    pub async fn signup(
        &self,
        business_code: &str,
        invitation_code: &str,
        email: &str,
    ) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/auth/signup/invitation",
            None,
            Some(json!({
                "email": email,
                "password": PASSWORD,
                "username": username(),
                "businessCode": business_code,
                "invitationCode": invitation_code,
            })),
        )
        .await
    }

    /// Invite a fresh address with `role` and sign it up.
    pub async fn join(&self, admin: &Session, role: &str) -> Session {
        let email = unique_email();
        let code = self.invite(admin, &email, role).await;
        let (status, body) = self.signup(&admin.business_code, &code, &email).await;
        assert_eq!(status, StatusCode::CREATED, "signup: {}", body);
        Session::from_body(&body, &email)
    }

    pub async fn login(&self, email: &str, password: &str, business_code: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({
                "email": email,
                "password": password,
                "businessCode": business_code,
            })),
        )
        .await
    }
}
