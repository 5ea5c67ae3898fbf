use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get, post},
};

use super::dto::{
    MarkAllReadResponse, NotificationListQuery, NotificationListResponse, NotificationResponse,
    NotificationSettingsResponse, UnreadCountResponse, UpdateNotificationSettingsRequest,
};
use crate::extractor::AuthUser;
use crate::notifications::NotificationManager;
use crate::routes::MessageResponse;
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/notifications", get(list_notifications))
        .route("/api/v1/notifications/unread-count", get(unread_count))
        .route("/api/v1/notifications/read-all", post(mark_all_read))
        .route(
            "/api/v1/notifications/settings",
            get(get_settings).put(update_settings),
        )
        .route(
            "/api/v1/notifications/{id}",
            delete(delete_notification),
        )
        .route("/api/v1/notifications/{id}/read", post(mark_read))
        .route("/api/v1/notifications/{id}/archive", post(archive))
}

/// Newest first
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(NotificationListQuery),
    responses(
        (status = 200, description = "Notifications page", body = NotificationListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    AuthUser(user): AuthUser,
    Query(query): Query<NotificationListQuery>,
) -> Result<(StatusCode, Json<NotificationListResponse>), (StatusCode, String)> {
    let page = NotificationManager::new(get_database_connection())
        .list(user.id, query.limit, query.offset, query.unread_only)
        .await?;

    Ok((StatusCode::OK, Json(page.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notifications", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn unread_count(
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<UnreadCountResponse>), (StatusCode, String)> {
    let unread = NotificationManager::new(get_database_connection())
        .unread_count(user.id)
        .await?;

    Ok((StatusCode::OK, Json(UnreadCountResponse { unread })))
}

/// Marks one notification read. Already read ones are returned unchanged.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification", body = NotificationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_read(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<NotificationResponse>), (StatusCode, String)> {
    let notification = NotificationManager::new(get_database_connection())
        .mark_read(user.id, id)
        .await?;

    Ok((StatusCode::OK, Json(notification.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (status = 200, description = "Number of notifications marked read", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_all_read(
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<MarkAllReadResponse>), (StatusCode, String)> {
    let updated = NotificationManager::new(get_database_connection())
        .mark_all_read(user.id)
        .await?;

    Ok((StatusCode::OK, Json(MarkAllReadResponse { updated })))
}

#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/archive",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification archived", body = NotificationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn archive(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<NotificationResponse>), (StatusCode, String)> {
    let notification = NotificationManager::new(get_database_connection())
        .archive(user.id, id)
        .await?;

    Ok((StatusCode::OK, Json(notification.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    params(("id" = i32, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Notification deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn delete_notification(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, String)> {
    NotificationManager::new(get_database_connection())
        .delete(user.id, id)
        .await?;

    Ok((StatusCode::OK, Json(MessageResponse::new("Notification deleted"))))
}

#[utoipa::path(
    get,
    path = "/api/v1/notifications/settings",
    responses(
        (status = 200, description = "Notification settings", body = NotificationSettingsResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn get_settings(
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<NotificationSettingsResponse>), (StatusCode, String)> {
    let settings = NotificationManager::new(get_database_connection())
        .settings(user.id)
        .await?;

    Ok((StatusCode::OK, Json(settings.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/notifications/settings",
    request_body = UpdateNotificationSettingsRequest,
    responses(
        (status = 200, description = "Settings updated", body = NotificationSettingsResponse),
        (status = 400, description = "Malformed quiet hours or negative lead time"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn update_settings(
    AuthUser(user): AuthUser,
    Json(payload): Json<UpdateNotificationSettingsRequest>,
) -> Result<(StatusCode, Json<NotificationSettingsResponse>), (StatusCode, String)> {
    let settings = NotificationManager::new(get_database_connection())
        .update_settings(user.id, payload.into())
        .await?;

    Ok((StatusCode::OK, Json(settings.into())))
}
