//! Asti Core - Shared types library.
//!
//! This crate provides common types used across all Asti platform components:
//! - `server` - The public REST API
//! - `integration-tests` - End-to-end tests driving the API in-process
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Document identifiers, emails, roles, and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
