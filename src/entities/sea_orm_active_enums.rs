//! Status and type enumerations stored as short strings

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    #[sea_orm(string_value = "planned")]
    Planned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "submitted")]
    Submitted,
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
    #[sea_orm(string_value = "late")]
    Late,
}

impl HomeworkStatus {
    /// Statuses that still count as open work for the student.
    pub const OPEN: [HomeworkStatus; 2] = [HomeworkStatus::Assigned, HomeworkStatus::InProgress];

    /// Statuses a submission may still be recorded from.
    pub const SUBMITTABLE: [HomeworkStatus; 3] = [
        HomeworkStatus::Assigned,
        HomeworkStatus::InProgress,
        HomeworkStatus::Late,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Assigned => "assigned",
            HomeworkStatus::InProgress => "in_progress",
            HomeworkStatus::Submitted => "submitted",
            HomeworkStatus::Reviewed => "reviewed",
            HomeworkStatus::Late => "late",
        }
    }
}

impl std::str::FromStr for HomeworkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(HomeworkStatus::Assigned),
            "in_progress" => Ok(HomeworkStatus::InProgress),
            "submitted" => Ok(HomeworkStatus::Submitted),
            "reviewed" => Ok(HomeworkStatus::Reviewed),
            "late" => Ok(HomeworkStatus::Late),
            other => Err(format!("Unknown homework status: {}", other)),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[sea_orm(string_value = "homework_assigned")]
    HomeworkAssigned,
    #[sea_orm(string_value = "homework_submitted")]
    HomeworkSubmitted,
    #[sea_orm(string_value = "homework_reviewed")]
    HomeworkReviewed,
    #[sea_orm(string_value = "lesson_scheduled")]
    LessonScheduled,
    #[sea_orm(string_value = "lesson_cancelled")]
    LessonCancelled,
    #[sea_orm(string_value = "lesson_reminder")]
    LessonReminder,
    #[sea_orm(string_value = "system_message")]
    SystemMessage,
    #[sea_orm(string_value = "ai_assistant")]
    AiAssistant,
    #[sea_orm(string_value = "knowledge_update")]
    KnowledgeUpdate,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "other")]
    Other,
}

impl Default for NotificationType {
    fn default() -> Self {
        NotificationType::SystemMessage
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    #[sea_orm(string_value = "unread")]
    Unread,
    #[sea_orm(string_value = "read")]
    Read,
    #[sea_orm(string_value = "archived")]
    Archived,
}
