use crate::entities::notification_settings;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};

pub struct NotificationSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Default)]
pub struct SettingsUpdate {
    pub email_enabled: Option<bool>,
    pub email_homework: Option<bool>,
    pub email_lessons: Option<bool>,
    pub email_system: Option<bool>,
    pub email_promotions: Option<bool>,
    pub push_enabled: Option<bool>,
    pub push_homework: Option<bool>,
    pub push_lessons: Option<bool>,
    pub push_system: Option<bool>,
    pub sms_enabled: Option<bool>,
    pub sms_lessons_reminder: Option<bool>,
    pub sms_important: Option<bool>,
    pub lesson_reminder_hours: Option<i32>,
    pub homework_reminder_days: Option<i32>,
    pub quiet_start: Option<String>,
    pub quiet_end: Option<String>,
}

impl<'a> NotificationSettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts the default settings row. Fails with a unique violation when
    /// the user already has one.
    pub async fn create_default(
        &self,
        user_id: i32,
    ) -> Result<notification_settings::Model, DbErr> {
        Self::create_default_with(self.db, user_id).await
    }

    /// Same as [`Self::create_default`] on an arbitrary connection, e.g. the
    /// registration transaction.
    pub async fn create_default_with<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
    ) -> Result<notification_settings::Model, DbErr> {
        let settings = notification_settings::ActiveModel {
            user_id: Set(user_id),
            email_enabled: Set(true),
            email_homework: Set(true),
            email_lessons: Set(true),
            email_system: Set(true),
            email_promotions: Set(false),
            push_enabled: Set(true),
            push_homework: Set(true),
            push_lessons: Set(true),
            push_system: Set(true),
            sms_enabled: Set(false),
            sms_lessons_reminder: Set(false),
            sms_important: Set(true),
            lesson_reminder_hours: Set(1),
            homework_reminder_days: Set(1),
            quiet_start: Set("22:00".to_string()),
            quiet_end: Set("08:00".to_string()),
            ..Default::default()
        };

        settings.insert(conn).await
    }

    pub async fn find_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<notification_settings::Model>, DbErr> {
        notification_settings::Entity::find()
            .filter(notification_settings::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn update(
        &self,
        settings: notification_settings::Model,
        updates: SettingsUpdate,
    ) -> Result<notification_settings::Model, DbErr> {
        let mut active_model: notification_settings::ActiveModel = settings.into();

        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = updates.$field {
                        active_model.$field = Set(value);
                    }
                )*
            };
        }

        apply!(
            email_enabled,
            email_homework,
            email_lessons,
            email_system,
            email_promotions,
            push_enabled,
            push_homework,
            push_lessons,
            push_system,
            sms_enabled,
            sms_lessons_reminder,
            sms_important,
            lesson_reminder_hours,
            homework_reminder_days,
            quiet_start,
            quiet_end,
        );

        active_model.update(self.db).await
    }
}
