mod common;

use axum::http::StatusCode;
use common::{TestApp, generate_unique_email, get, json};
use serde_json::json;

fn registration(email: &str) -> serde_json::Value {
    json!({
        "name": "Laura Gómez",
        "email": email,
        "password": "testpass123",
        "phone": "600111222"
    })
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();
    let email = generate_unique_email();

    let (status, body) = app
        .send(json("POST", "/api/auth/register", None, registration(&email)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "user");
    assert_eq!(body["status"], "active");
    assert!(body.get("password_hash").is_none());

    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": "testpass123" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert_eq!(body["user"]["email"], email);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new();
    let email = generate_unique_email();

    let (status, _) = app
        .send(json("POST", "/api/auth/register", None, registration(&email)))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/register",
            None,
            registration(&email.to_uppercase()),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = TestApp::new();

    let (status, _) = app
        .send(json(
            "POST",
            "/api/auth/register",
            None,
            json!({ "name": "Short", "email": "short@club.test", "password": "123" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/register",
            None,
            json!({ "email": "missing-name@club.test", "password": "testpass123" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name is required");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = TestApp::new();
    let member = app.create_member().await;

    let (status, body) = app
        .send(json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": member.email, "password": "wrongpass" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");

    let (status, _) = app
        .send(json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "nobody@club.test", "password": "testpass123" }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_banned_member_cannot_login() {
    let app = TestApp::new();
    let admin = app.create_admin().await;
    let member = app.create_member().await;

    let (status, body) = app
        .send(json(
            "PATCH",
            &format!("/api/users/{}/ban", member.id),
            Some(&admin.token),
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "banned");

    let (status, _) = app
        .send(json(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": member.email, "password": member.password }),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = TestApp::new();
    let member = app.create_member().await;

    let (status, body) = app.send(get("/api/auth/me", Some(&member.token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], member.id.to_string());
    assert_eq!(body["email"], member.email);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new();

    let (status, body) = app.send(get("/api/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = app.send(get("/api/auth/me", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
