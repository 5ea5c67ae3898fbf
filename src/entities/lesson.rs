//! `SeaORM` Entity for lessons table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::LessonStatus;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "lessons"
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
    pub start_time: DateTime,
    pub end_time: DateTime,
    pub status: LessonStatus,
    pub created_at: DateTime,
}

impl Model {
    pub fn is_participant(&self, user_id: i32) -> bool {
        self.student_id == user_id || self.teacher_id == user_id
    }

    /// The participant on the other side of the lesson from `user_id`.
    pub fn counterpart_of(&self, user_id: i32) -> i32 {
        if self.student_id == user_id {
            self.teacher_id
        } else {
            self.student_id
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    StudentId,
    TeacherId,
    Title,
    Description,
    StartTime,
    EndTime,
    Status,
    CreatedAt,
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
            Self::StartTime => ColumnType::DateTime.def(),
            Self::EndTime => ColumnType::DateTime.def(),
            Self::Status => ColumnType::String(StringLen::N(20)).def(),
            Self::CreatedAt => ColumnType::DateTime.def(),
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
