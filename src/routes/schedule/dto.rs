use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{lesson, recurring_lesson, sea_orm_active_enums::LessonStatus};
use crate::services::schedule::{
    DEFAULT_DURATION_MINUTES, DaySchedule, LessonInput, ManagedSchedule, RecurringLessonInput,
};

fn default_duration() -> i32 {
    DEFAULT_DURATION_MINUTES
}

fn default_days() -> i64 {
    7
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DayQuery {
    /// `YYYY-MM-DD`, today when omitted
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingQuery {
    /// Window length, 0 to 366 days
    #[serde(default = "default_days")]
    #[param(example = 7)]
    pub days: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLessonRequest {
    #[schema(example = "Algebra")]
    pub title: String,
    pub description: Option<String>,
    #[schema(example = "2026-10-20")]
    pub date: String,
    #[schema(example = "15:00")]
    pub start_time: String,
    #[serde(default = "default_duration")]
    #[schema(example = 60)]
    pub duration_minutes: i32,
    pub teacher_id: i32,
}

impl From<CreateLessonRequest> for LessonInput {
    fn from(req: CreateLessonRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            date: req.date,
            start_time: req.start_time,
            duration_minutes: req.duration_minutes,
            teacher_id: req.teacher_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRecurringLessonRequest {
    #[schema(example = "Physics")]
    pub title: String,
    pub description: Option<String>,
    /// 0 = Monday .. 6 = Sunday
    #[schema(example = 2)]
    pub day_of_week: i16,
    #[schema(example = "17:30")]
    pub start_time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: i32,
    pub teacher_id: i32,
}

impl From<CreateRecurringLessonRequest> for RecurringLessonInput {
    fn from(req: CreateRecurringLessonRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            day_of_week: req.day_of_week,
            start_time: req.start_time,
            duration_minutes: req.duration_minutes,
            teacher_id: req.teacher_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LessonResponse {
    pub id: i32,
    pub student_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: LessonStatus,
    pub created_at: NaiveDateTime,
}

impl From<lesson::Model> for LessonResponse {
    fn from(lesson: lesson::Model) -> Self {
        Self {
            id: lesson.id,
            student_id: lesson.student_id,
            teacher_id: lesson.teacher_id,
            title: lesson.title,
            description: lesson.description,
            start_time: lesson.start_time,
            end_time: lesson.end_time,
            status: lesson.status,
            created_at: lesson.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecurringLessonResponse {
    pub id: i32,
    pub student_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub day_of_week: i16,
    pub start_time: String,
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<recurring_lesson::Model> for RecurringLessonResponse {
    fn from(recurring: recurring_lesson::Model) -> Self {
        Self {
            id: recurring.id,
            student_id: recurring.student_id,
            teacher_id: recurring.teacher_id,
            title: recurring.title,
            description: recurring.description,
            day_of_week: recurring.day_of_week,
            start_time: recurring.start_time,
            duration_minutes: recurring.duration_minutes,
            is_active: recurring.is_active,
            created_at: recurring.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayScheduleResponse {
    pub date: NaiveDate,
    pub lessons: Vec<LessonResponse>,
    pub recurring: Vec<RecurringLessonResponse>,
}

impl From<DaySchedule> for DayScheduleResponse {
    fn from(day: DaySchedule) -> Self {
        Self {
            date: day.date,
            lessons: day.lessons.into_iter().map(Into::into).collect(),
            recurring: day.recurring.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ManagedScheduleResponse {
    pub lessons: Vec<LessonResponse>,
    pub recurring: Vec<RecurringLessonResponse>,
}

impl From<ManagedSchedule> for ManagedScheduleResponse {
    fn from(managed: ManagedSchedule) -> Self {
        Self {
            lessons: managed.lessons.into_iter().map(Into::into).collect(),
            recurring: managed.recurring.into_iter().map(Into::into).collect(),
        }
    }
}
