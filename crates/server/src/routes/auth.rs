//! Authentication and account-management route handlers.

use asti_core::Role;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::BearerToken;
use crate::models::{PublicUser, User};
use crate::services::auth::{self, AdminUpdate};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Admin creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
}

/// Admin update request body. All fields optional.
#[derive(Debug, Deserialize)]
pub struct UpdateAdminRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<Value>> {
    let (Some(name), Some(email), Some(password)) = (
        nonempty(body.name),
        nonempty(body.email),
        nonempty(body.password),
    ) else {
        return Err(AppError::Validation(
            "name, email, password required".to_owned(),
        ));
    };

    let user = state
        .auth()
        .register(&name, &email, &password, body.gender)
        .await?;
    Ok(Json(json!({
        "token": auth::token_for(user.role),
        "user": user.public(),
    })))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let (Some(email), Some(password)) = (nonempty(body.email), nonempty(body.password)) else {
        return Err(AppError::Validation("email, password required".to_owned()));
    };

    let user = state.auth().login(&email, &password).await?;
    Ok(Json(json!({
        "token": auth::token_for(user.role),
        "isAdmin": user.role.is_admin_tier(),
        "isKattaAdmin": user.role == Role::KattaAdmin,
        "user": user.public(),
    })))
}

/// `POST /api/auth/admin-login`
pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let (Some(email), Some(password)) = (nonempty(body.email), nonempty(body.password)) else {
        return Err(AppError::Validation("email, password required".to_owned()));
    };

    let user = state.auth().admin_login(&email, &password).await?;
    Ok(Json(json!({
        "token": auth::token_for(user.role),
        "isKattaAdmin": user.role == Role::KattaAdmin,
        "user": user.public(),
    })))
}

/// `GET /api/auth/me`
///
/// Resolves the acting identity behind the bearer token (header or `token`
/// cookie).
pub async fn me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>> {
    let user = state.auth().resolve_current_user(&token).await?;
    Ok(Json(json!({ "user": user.public() })))
}

/// `POST /api/auth/seed-admin`
///
/// Idempotently ensures the super-admin account exists.
pub async fn seed_admin(State(state): State<AppState>) -> Result<Json<Value>> {
    state.auth().seed_super_admin().await?;
    Ok(Json(json!({ "ok": true })))
}

/// `POST /api/auth/create-admin`
///
/// Super-admin only. The created account always has role `admin`; requesting
/// `katta_admin` is rejected outright.
pub async fn create_admin(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(body): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    require_super_admin(&state, &token).await?;

    if let Some(role) = body.role.as_deref() {
        if role == Role::KattaAdmin.as_str() {
            return Err(AppError::Forbidden(
                "Super-admin role cannot be assigned".to_owned(),
            ));
        }
        if role != Role::Admin.as_str() {
            return Err(AppError::Validation("role must be admin".to_owned()));
        }
    }

    let (Some(name), Some(email), Some(password)) = (
        nonempty(body.name),
        nonempty(body.email),
        nonempty(body.password),
    ) else {
        return Err(AppError::Validation(
            "name, email, password required".to_owned(),
        ));
    };

    let admin = state
        .auth()
        .create_admin(&name, &email, &password, body.gender)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": admin.public() })),
    ))
}

/// `GET /api/auth/admins`
pub async fn list_admins(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<PublicUser>>> {
    require_super_admin(&state, &token).await?;
    let admins = state.auth().list_admins().await;
    Ok(Json(admins.iter().map(User::public).collect()))
}

/// `PUT /api/auth/admins/{id}`
pub async fn update_admin(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
    Json(body): Json<UpdateAdminRequest>,
) -> Result<Json<Value>> {
    require_super_admin(&state, &token).await?;

    let role = match body.role.as_deref() {
        None => None,
        Some(raw) => Some(
            Role::parse(raw).ok_or_else(|| AppError::Validation("Invalid role".to_owned()))?,
        ),
    };

    let updated = state
        .auth()
        .update_admin(
            &id,
            AdminUpdate {
                name: body.name,
                email: body.email,
                password: body.password,
                gender: body.gender,
                role,
            },
        )
        .await?;
    Ok(Json(json!({ "user": updated.public() })))
}

/// `DELETE /api/auth/admins/{id}`
///
/// Deleting the super-admin is categorically forbidden.
pub async fn delete_admin(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    require_super_admin(&state, &token).await?;
    state.auth().delete_admin(&id).await?;
    Ok(Json(json!({ "ok": true })))
}

/// `GET /api/auth/users-manage`
pub async fn users_manage(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<PublicUser>>> {
    require_admin_tier(&state, &token).await?;
    let users = state.auth().list_users().await;
    Ok(Json(users.iter().map(User::public).collect()))
}

// =============================================================================
// Guards
// =============================================================================

/// Resolve the caller and require the super-admin role.
async fn require_super_admin(state: &AppState, token: &str) -> Result<User> {
    let user = state.auth().resolve_current_user(token).await?;
    if user.role == Role::KattaAdmin {
        Ok(user)
    } else {
        Err(AppError::Forbidden(
            "Super-admin access required".to_owned(),
        ))
    }
}

/// Resolve the caller and require any admin-tier role.
async fn require_admin_tier(state: &AppState, token: &str) -> Result<User> {
    let user = state.auth().resolve_current_user(token).await?;
    if user.role.is_admin_tier() {
        Ok(user)
    } else {
        Err(AppError::Forbidden("Admin access required".to_owned()))
    }
}

fn nonempty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}
