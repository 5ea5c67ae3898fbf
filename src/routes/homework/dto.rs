use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{homework, sea_orm_active_enums::HomeworkStatus};
use crate::services::homework::{HomeworkInput, HomeworkStats};

fn default_days() -> i64 {
    7
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HomeworkListQuery {
    /// One of assigned, in_progress, submitted, reviewed, late
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingHomeworkQuery {
    /// Window length, 0 to 366 days
    #[serde(default = "default_days")]
    pub days: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHomeworkRequest {
    pub student_id: i32,
    #[schema(example = "Chapter 3 exercises")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "2026-10-23T18:00:00")]
    pub due_date: NaiveDateTime,
}

impl From<CreateHomeworkRequest> for HomeworkInput {
    fn from(req: CreateHomeworkRequest) -> Self {
        Self {
            student_id: req.student_id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
        }
    }
}

/// Multipart body of the submit and attachment endpoints
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct HomeworkUploadForm {
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeworkResponse {
    pub id: i32,
    pub student_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
    pub status: HomeworkStatus,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
    pub has_attachment: bool,
    pub has_submission: bool,
    pub submission_comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub submitted_at: Option<NaiveDateTime>,
}

impl From<homework::Model> for HomeworkResponse {
    fn from(hw: homework::Model) -> Self {
        Self {
            id: hw.id,
            student_id: hw.student_id,
            teacher_id: hw.teacher_id,
            title: hw.title,
            description: hw.description,
            due_date: hw.due_date,
            status: hw.status,
            grade: hw.grade,
            feedback: hw.feedback,
            has_attachment: hw.attachment_path.is_some(),
            has_submission: hw.submission_path.is_some(),
            submission_comment: hw.submission_comment,
            created_at: hw.created_at,
            submitted_at: hw.submitted_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeworkStatsResponse {
    pub total: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub submitted: u64,
    pub reviewed: u64,
    pub late: u64,
}

impl From<HomeworkStats> for HomeworkStatsResponse {
    fn from(stats: HomeworkStats) -> Self {
        Self {
            total: stats.total,
            assigned: stats.assigned,
            in_progress: stats.in_progress,
            submitted: stats.submitted,
            reviewed: stats.reviewed,
            late: stats.late,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeworkListResponse {
    pub homework: Vec<HomeworkResponse>,
    pub stats: HomeworkStatsResponse,
}
