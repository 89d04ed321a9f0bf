//! HTTP middleware and request extractors.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. `TraceLayer` (request tracing)
//! 2. CORS (wide open, the API is consumed cross-origin)

pub mod auth;

pub use auth::BearerToken;
