//! News-suggestion route handlers.
//!
//! Visitors submit article suggestions which admins moderate. Approving one
//! promotes it into the news collection.

use asti_core::SuggestionStatus;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{now_iso, today_uz};
use crate::routes::{random_image, sort_newest_first, string_field};
use crate::state::AppState;
use crate::store::{Document, doc};

/// How much of the suggestion body the promoted article's teaser keeps.
const SHORT_DESC_LEN: usize = 150;

/// Moderation request body.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub status: Option<String>,
    #[serde(rename = "approvedBy")]
    pub approved_by: Option<String>,
}

/// `GET /api/suggestions`
pub async fn index(State(state): State<AppState>) -> Json<Vec<Document>> {
    let mut list = state.db().collection("suggestions").all().await;
    sort_newest_first(&mut list);
    Json(list)
}

/// `POST /api/suggestions`
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<(StatusCode, Json<Value>)> {
    let (Some(title), Some(category), Some(content), Some(author), Some(email)) = (
        string_field(&body, "title"),
        string_field(&body, "category"),
        string_field(&body, "content"),
        string_field(&body, "author"),
        string_field(&body, "email"),
    ) else {
        return Err(AppError::Validation(
            "Barcha maydonlar to'ldirilishi shart".to_owned(),
        ));
    };

    let suggestion = doc! {
        "title": title.clone(),
        "category": category,
        "content": content,
        "author": author.clone(),
        "email": email,
        "image": string_field(&body, "image").unwrap_or_else(random_image),
        "status": SuggestionStatus::Pending.as_str(),
        "createdAt": now_iso(),
    };
    let stored = state.db().collection("suggestions").insert(suggestion).await?;

    tracing::info!(title = %title, author = %author, "new suggestion submitted");
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Taklif muvaffaqiyatli yuborildi. Admin tasdiqlagach, bu yangilik saytda ko'rinadi.",
            "suggestion": stored,
        })),
    ))
}

/// `PUT /api/suggestions/{id}`
///
/// Moderation: the status must move to `approved` or `rejected`. Approval
/// publishes the suggestion as a news article.
pub async fn moderate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ModerateRequest>,
) -> Result<Json<Document>> {
    let status = body
        .status
        .as_deref()
        .and_then(SuggestionStatus::parse)
        .filter(|s| *s != SuggestionStatus::Pending)
        .ok_or_else(|| AppError::Validation("Noto'g'ri status".to_owned()))?;

    let suggestions = state.db().collection("suggestions");
    let mut changes = doc! { "status": status.as_str(), "updatedAt": now_iso() };
    if let Some(approved_by) = body.approved_by {
        changes.insert("approvedBy".to_owned(), Value::from(approved_by));
    }

    let updated = suggestions
        .update(&doc! { "_id": id.as_str() }, changes)
        .await?;
    if updated == 0 {
        return Err(AppError::NotFound("Taklif topilmadi".to_owned()));
    }

    let suggestion = suggestions
        .find_one(&doc! { "_id": id.as_str() })
        .await
        .ok_or_else(|| AppError::NotFound("Taklif topilmadi".to_owned()))?;

    if status == SuggestionStatus::Approved {
        state
            .db()
            .collection("news")
            .insert(promoted_article(&suggestion))
            .await?;
    }

    Ok(Json(suggestion))
}

/// `DELETE /api/suggestions/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let removed = state
        .db()
        .collection("suggestions")
        .remove(&doc! { "_id": id.as_str() })
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound("Taklif topilmadi".to_owned()));
    }
    Ok(Json(serde_json::json!({
        "message": "Taklif muvaffaqiyatli o'chirildi",
    })))
}

/// The news article an approved suggestion becomes.
fn promoted_article(suggestion: &Document) -> Document {
    let field = |key: &str| {
        suggestion
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    let content = field("content");

    doc! {
        "title": field("title"),
        "category": field("category"),
        "shortDesc": teaser(&content),
        "fullContent": content,
        "image": field("image"),
        "author": field("author"),
        "date": today_uz(),
        "createdAt": now_iso(),
        "fromSuggestion": true,
    }
}

/// The first `SHORT_DESC_LEN` characters of the content, elided.
fn teaser(content: &str) -> String {
    if content.chars().count() <= SHORT_DESC_LEN {
        content.to_owned()
    } else {
        let cut: String = content.chars().take(SHORT_DESC_LEN).collect();
        format!("{cut}...")
    }
}
