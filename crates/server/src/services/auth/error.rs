//! Authentication error types.

use asti_core::EmailError;
use thiserror::Error;

use crate::store::StoreError;

/// Errors from the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email failed structural validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Unknown email or password mismatch.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("email already exists")]
    EmailTaken,

    /// The bearer token does not map to any role class.
    #[error("invalid token")]
    InvalidToken,

    /// No user exists for the resolved role class, or the target id is gone.
    #[error("user not found")]
    UserNotFound,

    /// The super-admin record can never be modified or deleted.
    #[error("super-admin accounts cannot be changed")]
    SuperAdminImmutable,

    /// Password hashing or verification failed unexpectedly.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// A stored user document could not be decoded.
    #[error("stored user record is malformed: {0}")]
    Corrupt(String),

    /// The store rejected a write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
