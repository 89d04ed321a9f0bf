//! Services catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::now_iso;
use crate::routes::{copy_fields, sort_newest_first, string_field};
use crate::state::AppState;
use crate::store::{Document, doc};

/// Optional descriptive fields copied verbatim from the request body.
const SERVICE_FIELDS: &[&str] = &[
    "description",
    "price",
    "slug",
    "videoSrc",
    "person",
    "rating",
];

/// `GET /api/services`
pub async fn index(State(state): State<AppState>) -> Json<Vec<Document>> {
    let mut list = state.db().collection("services").all().await;
    sort_newest_first(&mut list);
    Json(list)
}

/// `POST /api/services`
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<(StatusCode, Json<Document>)> {
    let Some(name) = string_field(&body, "name") else {
        return Err(AppError::Validation("name required".to_owned()));
    };

    let now = now_iso();
    let mut service = doc! {
        "name": name,
        // 'male', 'female', or 'all'
        "gender": string_field(&body, "gender").unwrap_or_else(|| "all".to_owned()),
        "createdAt": now.clone(),
        "updatedAt": now,
    };
    copy_fields(&body, SERVICE_FIELDS, &mut service);

    let stored = state.db().collection("services").insert(service).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `PUT /api/services/{id}`
///
/// Merges the request body wholesale plus a fresh `updatedAt`.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut body): Json<Document>,
) -> Result<Json<Document>> {
    // Never let the body overwrite the identifier
    body.remove("_id");
    body.insert("updatedAt".to_owned(), Value::from(now_iso()));

    let services = state.db().collection("services");
    let updated = services.update(&doc! { "_id": id.as_str() }, body).await?;
    if updated == 0 {
        return Err(AppError::NotFound("Not found".to_owned()));
    }

    services
        .find_one(&doc! { "_id": id.as_str() })
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Not found".to_owned()))
}

/// `DELETE /api/services/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let removed = state
        .db()
        .collection("services")
        .remove(&doc! { "_id": id.as_str() })
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound("Not found".to_owned()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
