use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

use crate::lifecycle::{HomeworkTransitionError, LessonTransitionError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the service layer. Route handlers turn these into the
/// `(StatusCode, String)` pairs they return.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ServiceError::Database(_) | ServiceError::Io(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            ServiceError::Database(e)
                if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        )
    }
}

impl From<ServiceError> for (StatusCode, String) {
    fn from(err: ServiceError) -> Self {
        let status = err.status_code();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            tracing::error!(error = %err, "request failed");
        }
        (status, err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = self.into();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<HomeworkTransitionError> for ServiceError {
    fn from(err: HomeworkTransitionError) -> Self {
        match err {
            HomeworkTransitionError::ReviewUnsupported => {
                ServiceError::NotImplemented(err.to_string())
            }
            HomeworkTransitionError::AlreadySubmitted | HomeworkTransitionError::PastDue => {
                ServiceError::Conflict(err.to_string())
            }
        }
    }
}

impl From<LessonTransitionError> for ServiceError {
    fn from(err: LessonTransitionError) -> Self {
        ServiceError::Conflict(err.to_string())
    }
}
