//! Bearer token extractor.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;

/// Extractor for the caller's bearer token.
///
/// Reads `Authorization: Bearer <token>` first, falling back to a `token`
/// cookie. Rejects with 401 when neither is present; the token is not
/// validated here, only extracted.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(State(state): State<AppState>, BearerToken(token): BearerToken) -> ... {
///     let user = state.auth().resolve_current_user(&token).await?;
/// }
/// ```
#[derive(Debug)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_from_headers(parts).or_else(|| cookie_from_headers(parts)) {
            return Ok(Self(token));
        }
        Err(AppError::Unauthorized("No token provided".to_owned()))
    }
}

fn bearer_from_headers(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_owned)
}

fn cookie_from_headers(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix("token=")
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    })
}
