//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health                     - Health check
//! GET  /api/events                     - WebSocket event subscription
//!
//! # Auth
//! POST /api/auth/register              - Register a new user
//! POST /api/auth/login                 - Login
//! POST /api/auth/admin-login           - Login restricted to admin tiers
//! GET  /api/auth/me                    - Current user for the bearer token
//! POST /api/auth/seed-admin            - Idempotently seed the super-admin
//! POST /api/auth/create-admin          - Create an admin (super-admin only)
//! GET  /api/auth/admins                - List admin accounts (super-admin only)
//! PUT  /api/auth/admins/{id}           - Update an admin (super-admin only)
//! DELETE /api/auth/admins/{id}         - Delete an admin (super-admin only)
//! GET  /api/auth/users-manage          - List user accounts (admin tier)
//!
//! # Services catalog
//! GET  /api/services                   - List services, newest first
//! POST /api/services                   - Create a service
//! PUT  /api/services/{id}              - Update a service
//! DELETE /api/services/{id}            - Delete a service
//!
//! # Orders
//! GET  /api/orders                     - List orders, newest first
//! POST /api/orders                     - Place an order
//! PUT  /api/orders/{id}/status         - Transition order status
//! DELETE /api/orders/{id}              - Delete an order
//!
//! # Notifications
//! GET  /api/notifications              - List (optionally ?userEmail=)
//! POST /api/notifications              - Create a notification
//! PUT  /api/notifications/{id}/read    - Mark as read
//!
//! # News & suggestions
//! GET/POST /api/news, PUT/DELETE /api/news/{id}
//! GET/POST /api/suggestions, PUT/DELETE /api/suggestions/{id}
//! ```
//!
//! Unmatched routes answer `404 {"error":"Not Found"}`.

pub mod auth;
pub mod events;
pub mod news;
pub mod notifications;
pub mod orders;
pub mod services;
pub mod suggestions;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};

use crate::state::AppState;
use crate::store::Document;

/// Assemble the full API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/services", services_routes())
        .nest("/api/orders", orders_routes())
        .nest("/api/notifications", notifications_routes())
        .nest("/api/news", news_routes())
        .nest("/api/suggestions", suggestions_routes())
        .route("/api/health", get(health))
        .route("/api/events", get(events::subscribe))
        .fallback(not_found)
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/admin-login", post(auth::admin_login))
        .route("/me", get(auth::me))
        .route("/seed-admin", post(auth::seed_admin))
        .route("/create-admin", post(auth::create_admin))
        .route("/admins", get(auth::list_admins))
        .route("/admins/{id}", put(auth::update_admin).delete(auth::delete_admin))
        .route("/users-manage", get(auth::users_manage))
}

/// Create the services catalog router.
pub fn services_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(services::index).post(services::create))
        .route("/{id}", put(services::update).delete(services::remove))
}

/// Create the orders router.
pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}/status", put(orders::update_status))
        .route("/{id}", delete(orders::remove))
}

/// Create the notifications router.
pub fn notifications_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index).post(notifications::create))
        .route("/{id}/read", put(notifications::mark_read))
}

/// Create the news router.
pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(news::index).post(news::create))
        .route("/{id}", put(news::update).delete(news::remove))
}

/// Create the suggestions router.
pub fn suggestions_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(suggestions::index).post(suggestions::create))
        .route("/{id}", put(suggestions::moderate).delete(suggestions::remove))
}

/// Liveness health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// JSON 404 for unmatched routes.
async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

// =============================================================================
// Shared handler helpers
// =============================================================================

/// Sort documents newest first by their `createdAt` timestamp.
///
/// Timestamps are ISO 8601 strings, so lexicographic order is chronological.
pub(crate) fn sort_newest_first(docs: &mut [Document]) {
    docs.sort_by(|a, b| created_at(b).cmp(created_at(a)));
}

fn created_at(doc: &Document) -> &str {
    doc.get("createdAt").and_then(Value::as_str).unwrap_or("")
}

/// Copy the listed fields from `src` into `dest`, skipping absent ones.
pub(crate) fn copy_fields(src: &Document, keys: &[&str], dest: &mut Document) {
    for key in keys {
        if let Some(value) = src.get(*key) {
            dest.insert((*key).to_owned(), value.clone());
        }
    }
}

/// A non-empty string field from a request body, if present.
pub(crate) fn string_field(body: &Document, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Placeholder image URL for news and suggestions without one.
pub(crate) fn random_image() -> String {
    use rand::Rng;
    let id = rand::rng().random_range(0..1000);
    format!("https://picsum.photos/id/{id}/500/300")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::doc;

    #[test]
    fn test_sort_newest_first() {
        let mut docs = vec![
            doc! { "createdAt": "2024-01-01T00:00:00.000Z", "n": 1 },
            doc! { "createdAt": "2024-06-01T00:00:00.000Z", "n": 2 },
            doc! { "n": 3 },
        ];
        sort_newest_first(&mut docs);
        assert_eq!(docs.first().unwrap().get("n"), Some(&Value::from(2)));
        assert_eq!(docs.last().unwrap().get("n"), Some(&Value::from(3)));
    }

    #[test]
    fn test_copy_fields_skips_absent() {
        let src = doc! { "a": 1, "b": "two" };
        let mut dest = Document::new();
        copy_fields(&src, &["a", "b", "missing"], &mut dest);
        assert_eq!(dest.len(), 2);
    }

    #[test]
    fn test_string_field_rejects_empty() {
        let body = doc! { "name": "", "phone": "123", "rating": 5 };
        assert_eq!(string_field(&body, "name"), None);
        assert_eq!(string_field(&body, "phone"), Some("123".to_owned()));
        // Non-string values do not count
        assert_eq!(string_field(&body, "rating"), None);
    }
}
