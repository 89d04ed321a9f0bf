//! Notifications route handlers.

use asti_core::NotificationKind;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::events::Event;
use crate::models::now_iso;
use crate::routes::{sort_newest_first, string_field};
use crate::state::AppState;
use crate::store::{Document, doc};

/// Query parameters for the notification list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userEmail")]
    pub user_email: Option<String>,
}

/// `GET /api/notifications`
///
/// Optionally filtered to a single inbox via `?userEmail=`.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Document>> {
    let notifications = state.db().collection("notifications");
    let mut list = match query.user_email {
        Some(email) => {
            notifications
                .find(&doc! { "userEmail": email })
                .await
        }
        None => notifications.all().await,
    };
    sort_newest_first(&mut list);
    Json(list)
}

/// `POST /api/notifications`
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<(StatusCode, Json<Document>)> {
    let (Some(user_email), Some(title), Some(message)) = (
        string_field(&body, "userEmail"),
        string_field(&body, "title"),
        string_field(&body, "message"),
    ) else {
        return Err(AppError::Validation(
            "userEmail, title, and message are required".to_owned(),
        ));
    };

    let kind = string_field(&body, "type")
        .unwrap_or_else(|| NotificationKind::Info.as_str().to_owned());
    let notification = state
        .db()
        .collection("notifications")
        .insert(doc! {
            "userEmail": user_email,
            "title": title,
            "message": message,
            "type": kind,
            "read": false,
            "createdAt": now_iso(),
        })
        .await?;

    state
        .events()
        .publish(Event::NotificationCreated(Value::Object(
            notification.clone(),
        )));
    Ok((StatusCode::CREATED, Json(notification)))
}

/// `PUT /api/notifications/{id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>> {
    let notifications = state.db().collection("notifications");
    let updated = notifications
        .update(&doc! { "_id": id.as_str() }, doc! { "read": true })
        .await?;
    if updated == 0 {
        return Err(AppError::NotFound("Notification not found".to_owned()));
    }

    notifications
        .find_one(&doc! { "_id": id.as_str() })
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Notification not found".to_owned()))
}
