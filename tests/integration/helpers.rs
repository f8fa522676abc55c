//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use alumni_api::{AppState, build_router};
use alumni_core::config::{AdminFloor, AppConfig, StoreProvider};
use alumni_database::{MemoryStore, Stores};

pub const PASSWORD: &str = "secret1";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
}

impl TestApp {
    /// Built-in roles seeded, default settings.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_admin_floor(floor: AdminFloor) -> Self {
        let mut config = test_config();
        config.auth.admin_floor = floor;
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let stores = Stores::memory(MemoryStore::with_builtin_roles());
        let router = build_router(AppState::new(config, stores));
        Self { router }
    }

    /// Register a user with the given starting role and return their ID.
    pub async fn register(&self, username: &str, role: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({
                    "username": username,
                    "email": format!("{username}@x.com"),
                    "password": PASSWORD,
                    "confirm_password": PASSWORD,
                    "selected_role": role,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Registration failed: {:?}",
            response.body
        );

        response.body["data"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("No user id in registration response")
    }

    /// Login and return the session token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({
                    "username": username,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["data"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Register with a role and log straight in.
    pub async fn user_with_token(&self, username: &str, role: &str) -> (Uuid, String) {
        let id = self.register(username, role).await;
        let token = self.login(username, PASSWORD).await;
        (id, token)
    }

    /// Look up a role ID by name through the admin API.
    pub async fn role_id(&self, admin_token: &str, name: &str) -> Uuid {
        let response = self
            .request("GET", "/api/roles", None, Some(admin_token))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        response.body["data"]
            .as_array()
            .and_then(|roles| roles.iter().find(|r| r["name"] == name))
            .and_then(|r| r["id"].as_str())
            .and_then(|id| id.parse().ok())
            .unwrap_or_else(|| panic!("Role '{name}' not found"))
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.provider = StoreProvider::Memory;
    config.auth.jwt_secret = "integration-test-secret-integration-test".to_string();
    config
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The machine-readable error code of a failure body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
