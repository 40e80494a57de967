//! Common test utilities for integration tests
//!
//! Every test builds the real router on top of a fresh `MemoryStore`, so the
//! suite needs no database and tests never share state.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use daccord_api::app::{build_router, AppState};
use daccord_api::config::Config;
use daccord_shared::store::MemoryStore;
use serde_json::{json, Value};
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context with the router and direct access to its store
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
    pub config: Config,
}

/// A registered account
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Status code plus parsed JSON body
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "STORAGE_BACKEND" => Some("memory".to_string()),
            "JWT_SECRET" => Some(TEST_SECRET.to_string()),
            _ => None,
        })
        .expect("test config");

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config.clone());

        TestContext {
            app: build_router(state),
            store,
            config,
        }
    }

    /// Sends a request; `auth` is the raw `Authorization` header value
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> TestResponse {
        self.send(Method::GET, uri, Some(&user.bearer()), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(&user.bearer()), Some(body))
            .await
    }

    pub async fn put(&self, uri: &str, user: &TestUser, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(&user.bearer()), Some(body))
            .await
    }

    pub async fn delete(&self, uri: &str, user: &TestUser) -> TestResponse {
        self.send(Method::DELETE, uri, Some(&user.bearer()), None)
            .await
    }

    /// Registers `username` with password `secret123` and returns its token
    pub async fn register(&self, username: &str) -> TestUser {
        let response = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "secret123",
                    "displayName": username.to_uppercase(),
                })),
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "register failed: {}",
            response.body
        );

        TestUser {
            id: response.body["data"]["user"]["id"]
                .as_str()
                .and_then(|id| id.parse().ok())
                .expect("user id"),
            username: username.to_string(),
            token: response.body["data"]["token"]
                .as_str()
                .expect("token")
                .to_string(),
        }
    }

    /// Creates a community through the API and returns its id
    pub async fn create_community(&self, user: &TestUser, name: &str, category: &str) -> String {
        let response = self
            .post(
                "/api/communities",
                user,
                json!({
                    "name": name,
                    "description": format!("Everything about {}", name),
                    "category": category,
                }),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED);
        response.body["data"]["id"].as_str().unwrap().to_string()
    }
}
