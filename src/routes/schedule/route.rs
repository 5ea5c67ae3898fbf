use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{
    CreateLessonRequest, CreateRecurringLessonRequest, DayQuery, DayScheduleResponse,
    LessonResponse, ManagedScheduleResponse, RecurringLessonResponse, UpcomingQuery,
};
use crate::entities::user;
use crate::extractor::AuthUser;
use crate::lifecycle::LessonAction;
use crate::services::schedule;
use crate::static_service::get_database_connection;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/schedule", get(day_schedule).post(create_lesson))
        .route("/api/v1/schedule/manage", get(manage_schedule))
        .route("/api/v1/schedule/upcoming", get(upcoming_lessons))
        .route("/api/v1/schedule/recurring", post(create_recurring))
        .route(
            "/api/v1/schedule/recurring/{id}/toggle",
            post(toggle_recurring),
        )
        .route("/api/v1/schedule/{id}", get(get_lesson))
        .route("/api/v1/schedule/{id}/start", post(start_lesson))
        .route("/api/v1/schedule/{id}/complete", post(complete_lesson))
        .route("/api/v1/schedule/{id}/cancel", post(cancel_lesson))
}

/// Lessons on one day plus the active weekly slots
#[utoipa::path(
    get,
    path = "/api/v1/schedule",
    params(DayQuery),
    responses(
        (status = 200, description = "Day schedule", body = DayScheduleResponse),
        (status = 400, description = "Malformed date"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn day_schedule(
    AuthUser(user): AuthUser,
    Query(query): Query<DayQuery>,
) -> Result<(StatusCode, Json<DayScheduleResponse>), (StatusCode, String)> {
    let day = schedule::day_view(get_database_connection(), &user, query.date.as_deref()).await?;
    Ok((StatusCode::OK, Json(day.into())))
}

/// All future lessons and every recurring slot, active or not
#[utoipa::path(
    get,
    path = "/api/v1/schedule/manage",
    responses(
        (status = 200, description = "Managed schedule", body = ManagedScheduleResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn manage_schedule(
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<ManagedScheduleResponse>), (StatusCode, String)> {
    let managed = schedule::manage_view(get_database_connection(), &user).await?;
    Ok((StatusCode::OK, Json(managed.into())))
}

/// Book a lesson. A reminder notification is sent right away.
#[utoipa::path(
    post,
    path = "/api/v1/schedule",
    request_body = CreateLessonRequest,
    responses(
        (status = 201, description = "Lesson created", body = LessonResponse),
        (status = 400, description = "Invalid input or unknown teacher"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn create_lesson(
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<LessonResponse>), (StatusCode, String)> {
    let lesson = schedule::create_lesson(get_database_connection(), &user, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(lesson.into())))
}

/// Planned lessons in the next `days` days
#[utoipa::path(
    get,
    path = "/api/v1/schedule/upcoming",
    params(UpcomingQuery),
    responses(
        (status = 200, description = "Upcoming lessons", body = Vec<LessonResponse>),
        (status = 400, description = "Negative day count"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn upcoming_lessons(
    AuthUser(user): AuthUser,
    Query(query): Query<UpcomingQuery>,
) -> Result<(StatusCode, Json<Vec<LessonResponse>>), (StatusCode, String)> {
    let lessons = schedule::upcoming_lessons(get_database_connection(), &user, query.days).await?;
    Ok((
        StatusCode::OK,
        Json(lessons.into_iter().map(Into::into).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/schedule/{id}",
    params(("id" = i32, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson", body = LessonResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Lesson not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn get_lesson(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<LessonResponse>), (StatusCode, String)> {
    let lesson = schedule::get_lesson(get_database_connection(), &user, id).await?;
    Ok((StatusCode::OK, Json(lesson.into())))
}

async fn transition(
    user: user::Model,
    id: i32,
    action: LessonAction,
) -> Result<(StatusCode, Json<LessonResponse>), (StatusCode, String)> {
    let lesson = schedule::transition_lesson(get_database_connection(), &user, id, action).await?;
    Ok((StatusCode::OK, Json(lesson.into())))
}

/// planned -> in_progress
#[utoipa::path(
    post,
    path = "/api/v1/schedule/{id}/start",
    params(("id" = i32, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson started", body = LessonResponse),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Lesson already finished")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn start_lesson(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<LessonResponse>), (StatusCode, String)> {
    transition(user, id, LessonAction::Start).await
}

/// Repeating the call on a completed lesson succeeds without changes
#[utoipa::path(
    post,
    path = "/api/v1/schedule/{id}/complete",
    params(("id" = i32, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson completed", body = LessonResponse),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Lesson was cancelled")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn complete_lesson(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<LessonResponse>), (StatusCode, String)> {
    transition(user, id, LessonAction::Complete).await
}

/// Cancel a lesson and notify the other participant
#[utoipa::path(
    post,
    path = "/api/v1/schedule/{id}/cancel",
    params(("id" = i32, Path, description = "Lesson id")),
    responses(
        (status = 200, description = "Lesson cancelled", body = LessonResponse),
        (status = 404, description = "Lesson not found"),
        (status = 409, description = "Lesson already completed")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn cancel_lesson(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<LessonResponse>), (StatusCode, String)> {
    transition(user, id, LessonAction::Cancel).await
}

/// Add a weekly slot
#[utoipa::path(
    post,
    path = "/api/v1/schedule/recurring",
    request_body = CreateRecurringLessonRequest,
    responses(
        (status = 201, description = "Recurring lesson created", body = RecurringLessonResponse),
        (status = 400, description = "Invalid input or unknown teacher"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn create_recurring(
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateRecurringLessonRequest>,
) -> Result<(StatusCode, Json<RecurringLessonResponse>), (StatusCode, String)> {
    let recurring =
        schedule::create_recurring(get_database_connection(), &user, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(recurring.into())))
}

/// Flip `is_active` on a weekly slot
#[utoipa::path(
    post,
    path = "/api/v1/schedule/recurring/{id}/toggle",
    params(("id" = i32, Path, description = "Recurring lesson id")),
    responses(
        (status = 200, description = "Toggled", body = RecurringLessonResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Recurring lesson not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Schedule"
)]
pub async fn toggle_recurring(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecurringLessonResponse>), (StatusCode, String)> {
    let recurring = schedule::toggle_recurring(get_database_connection(), &user, id).await?;
    Ok((StatusCode::OK, Json(recurring.into())))
}
