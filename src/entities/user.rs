//! `SeaORM` Entity for users table

use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "users"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub id: i32,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_teacher: bool,
    pub phone_number: Option<String>,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub created_at: DateTime,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    Email,
    Username,
    FullName,
    HashedPassword,
    IsActive,
    IsVerified,
    IsTeacher,
    PhoneNumber,
    EmailNotifications,
    PushNotifications,
    CreatedAt,
    UpdatedAt,
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
    Notification,
    NotificationSettings,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Integer.def(),
            Self::Email => ColumnType::String(StringLen::None).def().unique(),
            Self::Username => ColumnType::String(StringLen::None).def().unique(),
            Self::FullName => ColumnType::String(StringLen::None).def().null(),
            Self::HashedPassword => ColumnType::String(StringLen::None).def(),
            Self::IsActive => ColumnType::Boolean.def(),
            Self::IsVerified => ColumnType::Boolean.def(),
            Self::IsTeacher => ColumnType::Boolean.def(),
            Self::PhoneNumber => ColumnType::String(StringLen::None).def().null(),
            Self::EmailNotifications => ColumnType::Boolean.def(),
            Self::PushNotifications => ColumnType::Boolean.def(),
            Self::CreatedAt => ColumnType::DateTime.def(),
            Self::UpdatedAt => ColumnType::DateTime.def().null(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Notification => Entity::has_many(super::notification::Entity).into(),
            Self::NotificationSettings => {
                Entity::has_one(super::notification_settings::Entity).into()
            }
        }
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl Related<super::notification_settings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationSettings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
