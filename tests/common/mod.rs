#![allow(dead_code)]

use std::path::PathBuf;

use activecenter::activecenter_auth::{Role, create_access_token};
use activecenter::activecenter_config::{CorsConfig, JwtConfig, UploadConfig};
use activecenter::activecenter_core::password::hash_password_with_cost;
use activecenter::activecenter_db::Repository;
use activecenter::activecenter_models::{CreateProductDto, CreateSpaceDto, Product, Space, User};
use activecenter::router::init_router;
use activecenter::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// The full router over in-memory storage, with its state kept so tests can
/// seed data directly.
pub struct TestApp {
    pub state: AppState,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_max_upload(1_500_000)
    }

    pub fn with_max_upload(max_bytes: usize) -> Self {
        let upload_dir = std::env::temp_dir().join(format!("activecenter-it-{}", Uuid::new_v4()));
        let jwt_config = JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 3600,
        };
        let upload_config = UploadConfig {
            dir: upload_dir.clone(),
            base_url: "http://localhost:3000/files".to_string(),
            max_bytes,
        };

        Self {
            state: AppState::in_memory(jwt_config, CorsConfig::from_vars(|_| None), upload_config),
            upload_dir,
        }
    }

    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Saves a user directly and issues it an access token.
    pub async fn create_test_user(&self, email: &str, role: Role) -> TestUser {
        let password_hash = hash_password_with_cost(TEST_PASSWORD, 4).unwrap();
        let user = User::new("Test User".to_string(), email.to_string(), password_hash, role);
        let user = self.state.users.save(user).await.unwrap();
        let token = create_access_token(
            user.id,
            &user.email,
            user.role,
            user.status,
            &self.state.jwt_config,
        )
        .unwrap();

        TestUser {
            id: user.id,
            email: user.email,
            password: TEST_PASSWORD.to_string(),
            token,
        }
    }

    pub async fn create_admin(&self) -> TestUser {
        self.create_test_user(&generate_unique_email(), Role::Admin)
            .await
    }

    pub async fn create_member(&self) -> TestUser {
        self.create_test_user(&generate_unique_email(), Role::User)
            .await
    }

    pub async fn create_product(&self, name: &str, category: &str, price: f64, stock: i32) -> Product {
        let product = Product::new(CreateProductDto {
            name: name.to_string(),
            description: format!("{} for club members", name),
            category: category.to_string(),
            price,
            stock,
        });
        self.state.products.save(product).await.unwrap()
    }

    pub async fn create_space(&self, title: &str, price_hour: f64, max_people: Option<i32>) -> Space {
        let space = Space::new(CreateSpaceDto {
            title: title.to_string(),
            description: format!("{} at the club", title),
            price_hour,
            max_people,
            details: None,
            characteristics: vec!["indoor".to_string()],
        });
        self.state.spaces.save(space).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub fn generate_unique_email() -> String {
    format!("member-{}@club.test", Uuid::new_v4())
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    with_auth(Request::builder().method("DELETE").uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    with_auth(Request::builder().method(method).uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub struct ImagePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub content: &'a [u8],
}

const BOUNDARY: &str = "activecenter-test-boundary";

pub fn multipart(
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    image: Option<ImagePart<'_>>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some(image) = image {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, image.file_name, image.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(image.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    with_auth(Request::builder().method("POST").uri(uri), token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn with_auth(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}
