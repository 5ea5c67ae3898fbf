use axum::{Json, Router, http::StatusCode, routing::get};

use super::dto::DashboardResponse;
use crate::extractor::AuthUser;
use crate::services::dashboard;
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new().route("/api/v1/dashboard", get(get_dashboard))
}

/// Next lessons, latest homework and the unread notification count
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<DashboardResponse>), (StatusCode, String)> {
    let dashboard = dashboard::overview(get_database_connection(), &user).await?;
    Ok((StatusCode::OK, Json(dashboard.into())))
}
