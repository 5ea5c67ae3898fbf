//! `SeaORM` Entity for notifications table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{NotificationStatus, NotificationType};

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "notifications"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub status: NotificationStatus,
    /// Loose link to another row, e.g. "lesson" or "homework". Not enforced.
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<i32>,
    /// 1 (lowest) to 5 (highest)
    pub priority: i16,
    pub is_actionable: bool,
    pub action_url: Option<String>,
    pub created_at: DateTime,
    pub read_at: Option<DateTime>,
    pub expires_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    UserId,
    Title,
    Message,
    NotificationType,
    Status,
    RelatedEntityType,
    RelatedEntityId,
    Priority,
    IsActionable,
    ActionUrl,
    CreatedAt,
    ReadAt,
    ExpiresAt,
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
            Self::UserId => ColumnType::Integer.def(),
            Self::Title => ColumnType::String(StringLen::N(255)).def(),
            Self::Message => ColumnType::Text.def(),
            Self::NotificationType => ColumnType::String(StringLen::N(30)).def(),
            Self::Status => ColumnType::String(StringLen::N(20)).def(),
            Self::RelatedEntityType => ColumnType::String(StringLen::N(50)).def().null(),
            Self::RelatedEntityId => ColumnType::Integer.def().null(),
            Self::Priority => ColumnType::SmallInteger.def(),
            Self::IsActionable => ColumnType::Boolean.def(),
            Self::ActionUrl => ColumnType::String(StringLen::N(500)).def().null(),
            Self::CreatedAt => ColumnType::DateTime.def(),
            Self::ReadAt => ColumnType::DateTime.def().null(),
            Self::ExpiresAt => ColumnType::DateTime.def().null(),
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
