//! `SeaORM` Entity for notification_settings table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "notification_settings"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub user_id: i32,

    pub email_enabled: bool,
    pub email_homework: bool,
    pub email_lessons: bool,
    pub email_system: bool,
    pub email_promotions: bool,

    pub push_enabled: bool,
    pub push_homework: bool,
    pub push_lessons: bool,
    pub push_system: bool,

    pub sms_enabled: bool,
    pub sms_lessons_reminder: bool,
    pub sms_important: bool,

    pub lesson_reminder_hours: i32,
    pub homework_reminder_days: i32,

    /// "HH:MM"
    pub quiet_start: String,
    /// "HH:MM"
    pub quiet_end: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    UserId,
    EmailEnabled,
    EmailHomework,
    EmailLessons,
    EmailSystem,
    EmailPromotions,
    PushEnabled,
    PushHomework,
    PushLessons,
    PushSystem,
    SmsEnabled,
    SmsLessonsReminder,
    SmsImportant,
    LessonReminderHours,
    HomeworkReminderDays,
    QuietStart,
    QuietEnd,
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
    User,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Integer.def(),
            Self::UserId => ColumnType::Integer.def().unique(),
            Self::LessonReminderHours | Self::HomeworkReminderDays => ColumnType::Integer.def(),
            Self::QuietStart | Self::QuietEnd => ColumnType::String(StringLen::N(5)).def(),
            _ => ColumnType::Boolean.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::User => Entity::belongs_to(super::user::Entity)
                .from(Column::UserId)
                .to(super::user::Column::Id)
                .into(),
        }
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
