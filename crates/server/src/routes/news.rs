//! News route handlers.
//!
//! Published articles, either authored directly by admins or promoted from
//! approved suggestions. User-facing validation messages are in Uzbek to
//! match the rest of the platform copy.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{now_iso, today_uz};
use crate::routes::{copy_fields, random_image, sort_newest_first, string_field};
use crate::state::AppState;
use crate::store::{Document, doc};

/// Fields an update request may change.
const NEWS_FIELDS: &[&str] = &[
    "title",
    "category",
    "shortDesc",
    "fullContent",
    "image",
    "author",
];

/// `GET /api/news`
pub async fn index(State(state): State<AppState>) -> Json<Vec<Document>> {
    let mut list = state.db().collection("news").all().await;
    sort_newest_first(&mut list);
    Json(list)
}

/// `POST /api/news`
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<(StatusCode, Json<Document>)> {
    let (Some(title), Some(category), Some(short_desc), Some(full_content), Some(author)) = (
        string_field(&body, "title"),
        string_field(&body, "category"),
        string_field(&body, "shortDesc"),
        string_field(&body, "fullContent"),
        string_field(&body, "author"),
    ) else {
        return Err(AppError::Validation(
            "Barcha maydonlar to'ldirilishi shart".to_owned(),
        ));
    };

    let article = doc! {
        "title": title,
        "category": category,
        "shortDesc": short_desc,
        "fullContent": full_content,
        "author": author,
        "image": string_field(&body, "image").unwrap_or_else(random_image),
        "date": string_field(&body, "date").unwrap_or_else(today_uz),
        "createdAt": now_iso(),
    };

    let stored = state.db().collection("news").insert(article).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `PUT /api/news/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Document>,
) -> Result<Json<Document>> {
    let mut changes = doc! { "updatedAt": now_iso() };
    copy_fields(&body, NEWS_FIELDS, &mut changes);

    let news = state.db().collection("news");
    let updated = news.update(&doc! { "_id": id.as_str() }, changes).await?;
    if updated == 0 {
        return Err(AppError::NotFound("Yangilik topilmadi".to_owned()));
    }

    news.find_one(&doc! { "_id": id.as_str() })
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Yangilik topilmadi".to_owned()))
}

/// `DELETE /api/news/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let removed = state
        .db()
        .collection("news")
        .remove(&doc! { "_id": id.as_str() })
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound("Yangilik topilmadi".to_owned()));
    }
    Ok(Json(serde_json::json!({
        "message": "Yangilik muvaffaqiyatli o'chirildi",
    })))
}
