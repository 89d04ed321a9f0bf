//! Orders route handlers.
//!
//! Orders carry requester details and an embedded snapshot of the ordered
//! service. Mutations publish events on the bus; select transitions also
//! insert notification documents (admin inbox on creation, the ordering
//! user on approval/rejection).

use asti_core::{NotificationKind, OrderStatus};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::events::Event;
use crate::models::now_iso;
use crate::routes::{copy_fields, sort_newest_first, string_field};
use crate::services::auth::ADMIN_INBOX;
use crate::state::AppState;
use crate::store::{Document, doc};

/// Optional requester fields copied verbatim from the request body.
const ORDER_FIELDS: &[&str] = &[
    "middleName",
    "organization",
    "address",
    "phone2",
    "position",
    "message",
    "service",
    "userEmail",
];

/// Status transition request body.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

/// `GET /api/orders`
pub async fn index(State(state): State<AppState>) -> Json<Vec<Document>> {
    let mut list = state.db().collection("orders").all().await;
    sort_newest_first(&mut list);
    Json(list)
}

/// `POST /api/orders`
///
/// Places an order with initial status `pending`, publishes `orders:new`,
/// and drops a notification into the admin inbox when the order is linked
/// to a user.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<Document>,
) -> Result<(StatusCode, Json<Document>)> {
    let (Some(first_name), Some(last_name), Some(phone)) = (
        string_field(&body, "firstName"),
        string_field(&body, "lastName"),
        string_field(&body, "phone"),
    ) else {
        return Err(AppError::Validation("Required fields missing".to_owned()));
    };

    let now = now_iso();
    let mut order = doc! {
        "firstName": first_name.clone(),
        "lastName": last_name.clone(),
        "phone": phone,
        "status": OrderStatus::Pending.as_str(),
        "createdAt": now.clone(),
        "updatedAt": now.clone(),
    };
    copy_fields(&body, ORDER_FIELDS, &mut order);

    let stored = state.db().collection("orders").insert(order).await?;

    if stored.get("userEmail").and_then(Value::as_str).is_some() {
        let service_name = service_name(&stored);
        state
            .db()
            .collection("notifications")
            .insert(doc! {
                "userEmail": ADMIN_INBOX,
                "title": "Yangi buyurtma!",
                "message": format!(
                    "{first_name} {last_name} tomonidan \"{service_name}\" uchun yangi buyurtma berildi."
                ),
                "type": NotificationKind::Info.as_str(),
                "read": false,
                "createdAt": now,
            })
            .await?;
    }

    state
        .events()
        .publish(Event::OrderCreated(Value::Object(stored.clone())));
    Ok((StatusCode::CREATED, Json(stored)))
}

/// `PUT /api/orders/{id}/status`
///
/// Transitions an order's status. An invalid status string is rejected with
/// 400 and changes nothing. Approval and rejection notify the ordering user
/// and publish `notification:new`; every transition publishes
/// `orders:updated`.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Document>> {
    let status = body
        .status
        .as_deref()
        .and_then(OrderStatus::parse)
        .ok_or_else(|| AppError::Validation("Invalid status".to_owned()))?;

    let orders = state.db().collection("orders");
    let updated = orders
        .update(
            &doc! { "_id": id.as_str() },
            doc! { "status": status.as_str(), "updatedAt": now_iso() },
        )
        .await?;
    if updated == 0 {
        return Err(AppError::NotFound("Order not found".to_owned()));
    }

    let order = orders
        .find_one(&doc! { "_id": id.as_str() })
        .await
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    if let Some(user_email) = order.get("userEmail").and_then(Value::as_str) {
        if let Some((title, message, kind)) = status_notification(status, &order) {
            let notification = state
                .db()
                .collection("notifications")
                .insert(doc! {
                    "userEmail": user_email,
                    "title": title,
                    "message": message,
                    "type": kind.as_str(),
                    "read": false,
                    "createdAt": now_iso(),
                })
                .await?;
            state
                .events()
                .publish(Event::NotificationCreated(Value::Object(notification)));
        }
    }

    state
        .events()
        .publish(Event::OrderUpdated(Value::Object(order.clone())));
    Ok(Json(order))
}

/// `DELETE /api/orders/{id}`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let removed = state
        .db()
        .collection("orders")
        .remove(&doc! { "_id": id.as_str() })
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound("Order not found".to_owned()));
    }

    state.events().publish(Event::OrderDeleted { id });
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Order deleted successfully",
    })))
}

/// The ordered service's display name, from the embedded snapshot.
fn service_name(order: &Document) -> &str {
    order
        .get("service")
        .and_then(|service| service.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("xizmat")
}

/// Notification copy for a status transition, if the transition warrants one.
fn status_notification(
    status: OrderStatus,
    order: &Document,
) -> Option<(String, String, NotificationKind)> {
    let service_name = service_name(order);
    match status {
        OrderStatus::Approved => Some((
            "Buyurtma qabul qilindi!".to_owned(),
            format!(
                "Sizning \"{service_name}\" buyurtmangiz muvaffaqiyatli qabul qilindi. Tez orada siz bilan bog'lanishadi."
            ),
            NotificationKind::Success,
        )),
        OrderStatus::Rejected => Some((
            "Buyurtma rad etildi".to_owned(),
            format!(
                "Afsuski, sizning \"{service_name}\" buyurtmangiz rad etildi. Batafsil ma'lumot uchun biz bilan bog'laning."
            ),
            NotificationKind::Warning,
        )),
        OrderStatus::Pending => None,
    }
}
