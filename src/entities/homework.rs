//! `SeaORM` Entity for homework table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::HomeworkStatus;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "homework"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub student_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime,
    pub status: HomeworkStatus,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
    pub attachment_path: Option<String>,
    pub submission_path: Option<String>,
    pub submission_comment: Option<String>,
    pub created_at: DateTime,
    pub submitted_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    StudentId,
    TeacherId,
    Title,
    Description,
    DueDate,
    Status,
    Grade,
    Feedback,
    AttachmentPath,
    SubmissionPath,
    SubmissionComment,
    CreatedAt,
    SubmittedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    Id,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = i32;
    fn auto_increment() -> bool {
        true
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Student,
    Teacher,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Integer.def(),
            Self::StudentId => ColumnType::Integer.def(),
            Self::TeacherId => ColumnType::Integer.def(),
            Self::Title => ColumnType::String(StringLen::None).def(),
            Self::Description => ColumnType::Text.def().null(),
            Self::DueDate => ColumnType::DateTime.def(),
            Self::Status => ColumnType::String(StringLen::N(20)).def(),
            Self::Grade => ColumnType::Integer.def().null(),
            Self::Feedback => ColumnType::Text.def().null(),
            Self::AttachmentPath => ColumnType::String(StringLen::None).def().null(),
            Self::SubmissionPath => ColumnType::String(StringLen::None).def().null(),
            Self::SubmissionComment => ColumnType::Text.def().null(),
            Self::CreatedAt => ColumnType::DateTime.def(),
            Self::SubmittedAt => ColumnType::DateTime.def().null(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Student => Entity::belongs_to(super::user::Entity)
                .from(Column::StudentId)
                .to(super::user::Column::Id)
                .into(),
            Self::Teacher => Entity::belongs_to(super::user::Entity)
                .from(Column::TeacherId)
                .to(super::user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
