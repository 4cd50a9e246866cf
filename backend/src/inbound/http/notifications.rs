//! The signed-in user's notification inbox.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Notification, NotificationId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};
use crate::inbound::http::{ApiResult, MessageResponse};

const NOTIFICATION_ID: FieldName = FieldName::new("notificationId");

/// Result of `PUT /api/v1/notifications/mark-all-read`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub message: String,
    pub updated: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Most recent notifications", body = [Notification]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Notification>>> {
    let user = state.current_user(&session).await?;
    Ok(web::Json(state.notifications.list(&user).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/mark-all-read",
    responses((status = 200, description = "Inbox cleared", body = MarkAllReadResponse)),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[put("/notifications/mark-all-read")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MarkAllReadResponse>> {
    let user = state.current_user(&session).await?;
    let updated = state.notifications.mark_all_read(&user).await?;
    Ok(web::Json(MarkAllReadResponse {
        message: "All notifications marked as read".to_owned(),
        updated,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read", body = MessageResponse),
        (status = 404, description = "Not found or not yours", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[put("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user = state.current_user(&session).await?;
    let id: NotificationId = parse_id(&path, NOTIFICATION_ID)?;
    state.notifications.mark_read(&user, &id).await?;
    Ok(web::Json(MessageResponse::new("Notification marked as read")))
}
