//! Integration test harness for the Asti platform API.
//!
//! Builds the full application router against a throwaway data directory
//! and drives it in-process with `tower::ServiceExt::oneshot`, so tests
//! exercise routing, extractors, and handlers without binding a socket.
//!
//! ```rust,ignore
//! let ctx = TestContext::new();
//! let (status, body) = ctx.post("/api/auth/register", json!({ ... })).await;
//! assert_eq!(status, StatusCode::OK);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use asti_server::config::ServerConfig;
use asti_server::state::AppState;
use asti_server::store::Database;

/// A fully wired application over a temp data directory.
///
/// The directory is removed on drop.
pub struct TestContext {
    state: AppState,
    app: Router,
    data_dir: PathBuf,
}

impl TestContext {
    /// Build a fresh application with an empty store.
    #[must_use]
    pub fn new() -> Self {
        let data_dir =
            std::env::temp_dir().join(format!("asti-it-{}", uuid::Uuid::new_v4().simple()));
        let config = ServerConfig::with_data_dir(&data_dir);
        let db = Database::open(&data_dir).unwrap();
        let state = AppState::new(config, db);
        let app = asti_server::app(state.clone());
        Self {
            state,
            app,
            data_dir,
        }
    }

    /// Build a fresh application with the super-admin account seeded.
    pub async fn with_super_admin() -> Self {
        let ctx = Self::new();
        ctx.state.auth().seed_super_admin().await.unwrap();
        ctx
    }

    /// The shared application state, for direct store and bus access.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Dispatch a request and return the status plus parsed JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// `GET` without credentials.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(request("GET", uri, None, None)).await
    }

    /// `GET` with a bearer token.
    pub async fn get_as(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request("GET", uri, Some(token), None)).await
    }

    /// `POST` a JSON body without credentials.
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, None, Some(body))).await
    }

    /// `POST` a JSON body with a bearer token.
    pub async fn post_as(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request("POST", uri, Some(token), Some(body)))
            .await
    }

    /// `PUT` a JSON body without credentials.
    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, None, Some(body))).await
    }

    /// `PUT` a JSON body with a bearer token.
    pub async fn put_as(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request("PUT", uri, Some(token), Some(body))).await
    }

    /// `DELETE` without credentials.
    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, None, None)).await
    }

    /// `DELETE` with a bearer token.
    pub async fn delete_as(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request("DELETE", uri, Some(token), None)).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
