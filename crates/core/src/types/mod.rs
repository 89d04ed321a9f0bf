//! Core types for the Asti platform.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::DocumentId;
pub use role::Role;
pub use status::{NotificationKind, OrderStatus, SuggestionStatus};
