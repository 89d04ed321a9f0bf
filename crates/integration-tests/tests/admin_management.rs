//! Integration tests for super-admin account management.

use asti_integration_tests::TestContext;
use asti_server::services::auth::{ADMIN_TOKEN, KATTA_ADMIN_TOKEN, USER_TOKEN};
use axum::http::StatusCode;
use serde_json::{Value, json};

async fn ctx_with_users() -> TestContext {
    let ctx = TestContext::with_super_admin().await;
    ctx.post(
        "/api/auth/register",
        json!({ "name": "Aziz", "email": "aziz@example.com", "password": "secret1" }),
    )
    .await;
    ctx
}

/// Create an admin as super-admin and return its id.
async fn create_admin(ctx: &TestContext, email: &str) -> String {
    let (status, body) = ctx
        .post_as(
            "/api/auth/create-admin",
            KATTA_ADMIN_TOKEN,
            json!({ "name": "Admin", "email": email, "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["user"]["id"].as_str().unwrap().to_owned()
}

// =============================================================================
// Guards
// =============================================================================

#[tokio::test]
async fn test_create_admin_requires_super_admin() {
    let ctx = ctx_with_users().await;

    let (status, body) = ctx
        .post_as(
            "/api/auth/create-admin",
            USER_TOKEN,
            json!({ "name": "A", "email": "a@b.co", "password": "x" }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Super-admin access required");
}

#[tokio::test]
async fn test_create_admin_never_grants_super_admin_role() {
    let ctx = TestContext::with_super_admin().await;

    let (status, _) = ctx
        .post_as(
            "/api/auth/create-admin",
            KATTA_ADMIN_TOKEN,
            json!({
                "name": "Sneaky",
                "email": "sneaky@example.com",
                "password": "secret1",
                "role": "katta_admin",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_users_manage_allows_any_admin_tier() {
    let ctx = ctx_with_users().await;
    create_admin(&ctx, "admin@example.com").await;

    // Plain admin token is enough here, unlike /admins
    let (status, body) = ctx.get_as("/api/auth/users-manage", ADMIN_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().unwrap();
    assert!(users.iter().any(|u| u["email"] == "aziz@example.com"));

    let (status, _) = ctx.get_as("/api/auth/users-manage", USER_TOKEN).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// =============================================================================
// Admin CRUD
// =============================================================================

#[tokio::test]
async fn test_created_admin_appears_in_listing() {
    let ctx = TestContext::with_super_admin().await;
    create_admin(&ctx, "admin@example.com").await;

    let (status, body) = ctx.get_as("/api/auth/admins", KATTA_ADMIN_TOKEN).await;

    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["email"].as_str())
        .collect();
    assert!(emails.contains(&"admin@example.com"));
    // The super-admin itself is part of the admin tier
    assert!(emails.contains(&"admin@local"));
}

#[tokio::test]
async fn test_update_admin_changes_profile() {
    let ctx = TestContext::with_super_admin().await;
    let id = create_admin(&ctx, "admin@example.com").await;

    let (status, body) = ctx
        .put_as(
            &format!("/api/auth/admins/{id}"),
            KATTA_ADMIN_TOKEN,
            json!({ "name": "Renamed" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Renamed");
}

#[tokio::test]
async fn test_update_admin_rejects_unknown_role() {
    let ctx = TestContext::with_super_admin().await;
    let id = create_admin(&ctx, "admin@example.com").await;

    let (status, body) = ctx
        .put_as(
            &format!("/api/auth/admins/{id}"),
            KATTA_ADMIN_TOKEN,
            json!({ "role": "emperor" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid role");
}

#[tokio::test]
async fn test_super_admin_account_is_immutable() {
    let ctx = TestContext::with_super_admin().await;

    let (_, admins) = ctx.get_as("/api/auth/admins", KATTA_ADMIN_TOKEN).await;
    let super_id = admins
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["email"] == "admin@local")
        .and_then(|a| a["id"].as_str())
        .unwrap()
        .to_owned();

    let (status, _) = ctx
        .put_as(
            &format!("/api/auth/admins/{super_id}"),
            KATTA_ADMIN_TOKEN,
            json!({ "name": "Hacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .delete_as(&format!("/api/auth/admins/{super_id}"), KATTA_ADMIN_TOKEN)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_admin() {
    let ctx = TestContext::with_super_admin().await;
    let id = create_admin(&ctx, "admin@example.com").await;

    let (status, body) = ctx
        .delete_as(&format!("/api/auth/admins/{id}"), KATTA_ADMIN_TOKEN)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (_, admins) = ctx.get_as("/api/auth/admins", KATTA_ADMIN_TOKEN).await;
    assert!(
        !admins
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a["email"] == "admin@example.com")
    );
}

#[tokio::test]
async fn test_seed_admin_is_idempotent() {
    let ctx = TestContext::new();

    let (status, _) = ctx.post("/api/auth/seed-admin", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.post("/api/auth/seed-admin", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, admins) = ctx.get_as("/api/auth/admins", KATTA_ADMIN_TOKEN).await;
    let seeded: Vec<&Value> = admins
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["email"] == "admin@local")
        .collect();
    assert_eq!(seeded.len(), 1);
}
