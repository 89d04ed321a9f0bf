//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::events::EventBus;
use crate::services::auth::{AuthService, SessionSlots};
use crate::store::Database;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc` and provides access to the document store,
/// the session slots, and the event bus.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    db: Database,
    sessions: SessionSlots,
    events: EventBus,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, db: Database) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                sessions: SessionSlots::default(),
                events: EventBus::new(),
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Get a reference to the per-role session slots.
    #[must_use]
    pub fn sessions(&self) -> &SessionSlots {
        &self.inner.sessions
    }

    /// Get a reference to the event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Construct an auth service borrowing this state's store and sessions.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.db(), self.sessions())
    }
}
