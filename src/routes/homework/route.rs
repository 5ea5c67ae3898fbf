use std::path::PathBuf;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use super::dto::{
    CreateHomeworkRequest, HomeworkListQuery, HomeworkListResponse, HomeworkResponse, HomeworkUploadForm,
    UpcomingHomeworkQuery,
};
use crate::config::APP_CONFIG;
use crate::entities::homework as homework_entity;
use crate::extractor::AuthUser;
use crate::services::homework::{self, SubmissionInput};
use crate::static_service::get_database_connection;
use crate::utils::upload::read_upload_form;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/homework", get(list_homework).post(create_homework))
        .route("/api/v1/homework/upcoming", get(upcoming_homework))
        .route("/api/v1/homework/late", get(late_homework))
        .route("/api/v1/homework/{id}", get(get_homework))
        .route("/api/v1/homework/{id}/start", post(start_homework))
        .route("/api/v1/homework/{id}/submit", post(submit_homework))
        .route(
            "/api/v1/homework/{id}/attachment",
            get(download_attachment).post(upload_attachment),
        )
        .route("/api/v1/homework/{id}/submission", get(download_submission))
        .route("/api/v1/homework/{id}/review", post(review_homework))
}

fn homework_list(items: Vec<homework_entity::Model>) -> Json<Vec<HomeworkResponse>> {
    Json(items.into_iter().map(Into::into).collect())
}

async fn send_file(path: PathBuf) -> Result<impl IntoResponse, (StatusCode, String)> {
    let data = tokio::fs::read(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read stored file");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read file".to_string(),
        )
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        data,
    ))
}

/// Student's homework with per-status counts
#[utoipa::path(
    get,
    path = "/api/v1/homework",
    params(HomeworkListQuery),
    responses(
        (status = 200, description = "Homework list", body = HomeworkListResponse),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn list_homework(
    AuthUser(user): AuthUser,
    Query(query): Query<HomeworkListQuery>,
) -> Result<(StatusCode, Json<HomeworkListResponse>), (StatusCode, String)> {
    let (items, stats) =
        homework::list_homework(get_database_connection(), &user, query.status.as_deref()).await?;

    Ok((
        StatusCode::OK,
        Json(HomeworkListResponse {
            homework: items.into_iter().map(Into::into).collect(),
            stats: stats.into(),
        }),
    ))
}

/// Assign homework to a student (teachers only)
#[utoipa::path(
    post,
    path = "/api/v1/homework",
    request_body = CreateHomeworkRequest,
    responses(
        (status = 201, description = "Homework assigned", body = HomeworkResponse),
        (status = 400, description = "Invalid input or unknown student"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a teacher")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn create_homework(
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateHomeworkRequest>,
) -> Result<(StatusCode, Json<HomeworkResponse>), (StatusCode, String)> {
    let hw = homework::create_homework(get_database_connection(), &user, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(hw.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/homework/upcoming",
    params(UpcomingHomeworkQuery),
    responses(
        (status = 200, description = "Open homework due soon", body = Vec<HomeworkResponse>),
        (status = 400, description = "Negative day count"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn upcoming_homework(
    AuthUser(user): AuthUser,
    Query(query): Query<UpcomingHomeworkQuery>,
) -> Result<(StatusCode, Json<Vec<HomeworkResponse>>), (StatusCode, String)> {
    let items = homework::upcoming_homework(get_database_connection(), &user, query.days).await?;
    Ok((StatusCode::OK, homework_list(items)))
}

/// Marks overdue open homework as late, then lists all late homework
#[utoipa::path(
    get,
    path = "/api/v1/homework/late",
    responses(
        (status = 200, description = "Late homework", body = Vec<HomeworkResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn late_homework(
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<Vec<HomeworkResponse>>), (StatusCode, String)> {
    let items = homework::late_homework(get_database_connection(), &user).await?;
    Ok((StatusCode::OK, homework_list(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/homework/{id}",
    params(("id" = i32, Path, description = "Homework id")),
    responses(
        (status = 200, description = "Homework", body = HomeworkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Homework not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn get_homework(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<HomeworkResponse>), (StatusCode, String)> {
    let hw = homework::get_homework(get_database_connection(), &user, id).await?;
    Ok((StatusCode::OK, Json(hw.into())))
}

/// assigned -> in_progress; later states are returned unchanged
#[utoipa::path(
    post,
    path = "/api/v1/homework/{id}/start",
    params(("id" = i32, Path, description = "Homework id")),
    responses(
        (status = 200, description = "Homework", body = HomeworkResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Homework not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn start_homework(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<HomeworkResponse>), (StatusCode, String)> {
    let hw = homework::start_homework(get_database_connection(), &user, id).await?;
    Ok((StatusCode::OK, Json(hw.into())))
}

/// Hand in homework with an optional file and comment. The teacher is notified.
#[utoipa::path(
    post,
    path = "/api/v1/homework/{id}/submit",
    params(("id" = i32, Path, description = "Homework id")),
    request_body(content = HomeworkUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Homework submitted", body = HomeworkResponse),
        (status = 400, description = "Malformed form"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Homework not found"),
        (status = 409, description = "Already submitted or past due")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn submit_homework(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<HomeworkResponse>), (StatusCode, String)> {
    let form = read_upload_form(multipart).await?;

    let hw = homework::submit_homework(
        get_database_connection(),
        &user,
        id,
        SubmissionInput {
            file: form.file,
            comment: form.comment,
        },
        &APP_CONFIG.upload_dir,
    )
    .await?;

    Ok((StatusCode::OK, Json(hw.into())))
}

/// Attach a task file to homework (assigning teacher only)
#[utoipa::path(
    post,
    path = "/api/v1/homework/{id}/attachment",
    params(("id" = i32, Path, description = "Homework id")),
    request_body(content = HomeworkUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Attachment stored", body = HomeworkResponse),
        (status = 400, description = "No file in form"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Homework not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn upload_attachment(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<HomeworkResponse>), (StatusCode, String)> {
    let file = read_upload_form(multipart)
        .await?
        .file
        .ok_or((StatusCode::BAD_REQUEST, "No file provided".to_string()))?;

    let hw = homework::upload_attachment(
        get_database_connection(),
        &user,
        id,
        file,
        &APP_CONFIG.upload_dir,
    )
    .await?;

    Ok((StatusCode::OK, Json(hw.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/homework/{id}/attachment",
    params(("id" = i32, Path, description = "Homework id")),
    responses(
        (status = 200, description = "Attachment bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Homework or file not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn download_attachment(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let path = homework::attachment_file(get_database_connection(), &user, id).await?;
    send_file(path).await
}

#[utoipa::path(
    get,
    path = "/api/v1/homework/{id}/submission",
    params(("id" = i32, Path, description = "Homework id")),
    responses(
        (status = 200, description = "Submitted file bytes", body = Vec<u8>, content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Homework or file not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn download_submission(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let path = homework::submission_file(get_database_connection(), &user, id).await?;
    send_file(path).await
}

/// Grading is not available yet
#[utoipa::path(
    post,
    path = "/api/v1/homework/{id}/review",
    params(("id" = i32, Path, description = "Homework id")),
    responses(
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Homework not found"),
        (status = 501, description = "Review workflow not implemented")
    ),
    security(("bearer_auth" = [])),
    tag = "Homework"
)]
pub async fn review_homework(
    AuthUser(user): AuthUser,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<HomeworkResponse>), (StatusCode, String)> {
    let hw = homework::review_homework(get_database_connection(), &user, id).await?;
    Ok((StatusCode::OK, Json(hw.into())))
}
