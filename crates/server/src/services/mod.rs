//! Domain services.

pub mod auth;
