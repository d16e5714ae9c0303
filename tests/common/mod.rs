#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use letsplay::letsplay_auth::Role;
use letsplay::letsplay_config::JwtConfig;
use letsplay::letsplay_core::hash_password;
use letsplay::letsplay_db::Store;
use letsplay::letsplay_models::NewUser;
use letsplay::router::init_router;
use letsplay::state::AppState;

pub const TEST_PASSWORD: &str = "password123";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        expiry: 3600,
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn generate_unique_email() -> String {
    format!("player-{}@example.com", Uuid::new_v4().simple())
}

pub fn generate_unique_username() -> String {
    format!("player_{}", &Uuid::new_v4().simple().to_string()[..12])
}

impl TestApp {
    pub fn new() -> Self {
        let state = AppState::in_memory(&test_jwt_config());
        Self {
            router: init_router(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers a fresh `USER` account through the API and logs it in.
    pub async fn create_user(&self) -> TestUser {
        let email = generate_unique_email();
        let response = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": generate_unique_username(),
                    "email": email,
                    "password": TEST_PASSWORD,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        let id = Uuid::parse_str(response.body["id"].as_str().unwrap()).unwrap();

        let token = self.token_for(&email).await;
        TestUser { id, email, token }
    }

    /// Admins cannot be created over HTTP, so they go straight into the store.
    pub async fn create_admin(&self) -> TestUser {
        let email = generate_unique_email();
        let user = self
            .state
            .store
            .insert_user(NewUser {
                username: generate_unique_username(),
                email: email.clone(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                role: Role::Admin,
            })
            .await
            .unwrap();

        let token = self.token_for(&email).await;
        TestUser {
            id: user.id,
            email,
            token,
        }
    }

    async fn token_for(&self, email: &str) -> String {
        let response = self.login(email, TEST_PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_product(&self, token: &str, name: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/products",
                Some(token),
                Some(json!({
                    "name": name,
                    "description": "A test product",
                    "price": 19.99,
                    "category": "games",
                    "stock": 5,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}

/// Every error body carries the same five fields.
pub fn assert_error_envelope(response: &TestResponse, path: &str) {
    let body = &response.body;
    assert_eq!(body["status"], response.status.as_u16(), "{body}");
    assert!(body["timestamp"].is_string(), "{body}");
    assert!(body["error"].is_string(), "{body}");
    assert!(body["message"].is_string(), "{body}");
    assert_eq!(body["path"], path, "{body}");
}
