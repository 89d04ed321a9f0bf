//! Integration tests for registration, login, and identity resolution.

use asti_integration_tests::TestContext;
use asti_server::services::auth::{KATTA_ADMIN_TOKEN, USER_TOKEN};
use axum::http::StatusCode;
use serde_json::json;

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_returns_token_and_sanitized_user() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post(
            "/api/auth/register",
            json!({ "name": "Aziz", "email": "Aziz@Example.com", "password": "secret1" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], USER_TOKEN);
    // Emails are normalized to lowercase
    assert_eq!(body["user"]["email"], "aziz@example.com");
    assert_eq!(body["user"]["role"], "user");
    // The password hash never leaves the server
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn test_register_rejects_missing_fields() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post("/api/auth/register", json!({ "email": "a@b.co" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name, email, password required");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let ctx = TestContext::new();
    let payload = json!({ "name": "Aziz", "email": "aziz@example.com", "password": "secret1" });

    let (status, _) = ctx.post("/api/auth/register", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.post("/api/auth/register", payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already exists");
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_roundtrip() {
    let ctx = TestContext::new();
    ctx.post(
        "/api/auth/register",
        json!({ "name": "Aziz", "email": "aziz@example.com", "password": "secret1" }),
    )
    .await;

    let (status, body) = ctx
        .post(
            "/api/auth/login",
            json!({ "email": "aziz@example.com", "password": "secret1" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], USER_TOKEN);
    assert_eq!(body["isAdmin"], false);
    assert_eq!(body["isKattaAdmin"], false);
    assert_eq!(body["user"]["name"], "Aziz");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let ctx = TestContext::new();
    ctx.post(
        "/api/auth/register",
        json!({ "name": "Aziz", "email": "aziz@example.com", "password": "secret1" }),
    )
    .await;

    let (status, body) = ctx
        .post(
            "/api/auth/login",
            json!({ "email": "aziz@example.com", "password": "wrong" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_admin_login_rejects_regular_users() {
    let ctx = TestContext::new();
    ctx.post(
        "/api/auth/register",
        json!({ "name": "Aziz", "email": "aziz@example.com", "password": "secret1" }),
    )
    .await;

    let (status, _) = ctx
        .post(
            "/api/auth/admin-login",
            json!({ "email": "aziz@example.com", "password": "secret1" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_login_accepts_super_admin() {
    let ctx = TestContext::with_super_admin().await;

    let (status, body) = ctx
        .post(
            "/api/auth/admin-login",
            json!({ "email": "admin@local", "password": "admin123" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], KATTA_ADMIN_TOKEN);
    assert_eq!(body["isKattaAdmin"], true);
}

// =============================================================================
// Identity Resolution
// =============================================================================

#[tokio::test]
async fn test_me_resolves_last_session_for_token() {
    let ctx = TestContext::new();
    ctx.post(
        "/api/auth/register",
        json!({ "name": "Aziz", "email": "aziz@example.com", "password": "secret1" }),
    )
    .await;

    let (status, body) = ctx.get_as("/api/auth/me", USER_TOKEN).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "aziz@example.com");
}

#[tokio::test]
async fn test_me_rejects_unknown_token() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get_as("/api/auth/me", "not-a-real-token").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_me_requires_a_token() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/api/auth/me").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");
}

#[tokio::test]
async fn test_me_falls_back_to_most_recent_user_after_restart() {
    // Session slots are in-memory; a valid token with no slot resolves
    // to the most recently created account of that role.
    let ctx = TestContext::new();
    ctx.post(
        "/api/auth/register",
        json!({ "name": "First", "email": "first@example.com", "password": "secret1" }),
    )
    .await;
    ctx.post(
        "/api/auth/register",
        json!({ "name": "Second", "email": "second@example.com", "password": "secret1" }),
    )
    .await;

    let (status, body) = ctx.get_as("/api/auth/me", USER_TOKEN).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "second@example.com");
}

// =============================================================================
// Misc
// =============================================================================

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let ctx = TestContext::new();
    let (status, body) = ctx.get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}
