use chrono::{NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;

use super::channels::{self, DeliveryPlan};
use crate::config::NOTIFICATION_PAGE_LIMIT;
use crate::entities::{
    homework, lesson, notification, notification_settings,
    sea_orm_active_enums::{NotificationStatus, NotificationType},
};
use crate::error::{ServiceError, ServiceResult};
use crate::repositories::{
    NotificationRepository, NotificationRow, NotificationSettingsRepository, SettingsUpdate,
};
use crate::utils::validators::parse_time;

pub const MIN_PRIORITY: i16 = 1;
pub const MAX_PRIORITY: i16 = 5;

/// Input for [`NotificationManager::create`]. Starts from the defaults: system
/// message, priority 1, not actionable, no link.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub related_entity: Option<(String, i32)>,
    pub action_url: Option<String>,
    pub priority: i16,
    pub is_actionable: bool,
    pub expires_at: Option<NaiveDateTime>,
}

impl NewNotification {
    pub fn new(user_id: i32, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            message: message.into(),
            notification_type: NotificationType::default(),
            related_entity: None,
            action_url: None,
            priority: MIN_PRIORITY,
            is_actionable: false,
            expires_at: None,
        }
    }

    pub fn kind(mut self, notification_type: NotificationType) -> Self {
        self.notification_type = notification_type;
        self
    }

    pub fn related(mut self, entity_type: &str, entity_id: i32) -> Self {
        self.related_entity = Some((entity_type.to_string(), entity_id));
        self
    }

    pub fn action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    pub fn priority(mut self, priority: i16) -> Self {
        self.priority = priority;
        self
    }

    pub fn actionable(mut self) -> Self {
        self.is_actionable = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct CreatedNotification {
    pub notification: notification::Model,
    pub delivery: DeliveryPlan,
}

#[derive(Debug, Clone)]
pub struct NotificationPage {
    pub notifications: Vec<notification::Model>,
    pub total: u64,
    pub has_more: bool,
}

pub struct NotificationManager<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationManager<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts one unread notification. Identical calls produce separate rows.
    pub async fn create(&self, new: NewNotification) -> ServiceResult<CreatedNotification> {
        let now = Utc::now().naive_utc();
        let (related_entity_type, related_entity_id) = match new.related_entity {
            Some((entity_type, entity_id)) => (Some(entity_type), Some(entity_id)),
            None => (None, None),
        };

        let notification = NotificationRepository::new(self.db)
            .insert(NotificationRow {
                user_id: new.user_id,
                title: new.title,
                message: new.message,
                notification_type: new.notification_type,
                related_entity_type,
                related_entity_id,
                priority: new.priority.clamp(MIN_PRIORITY, MAX_PRIORITY),
                is_actionable: new.is_actionable,
                action_url: new.action_url,
                expires_at: new.expires_at,
                created_at: now,
            })
            .await?;

        let delivery = match NotificationSettingsRepository::new(self.db)
            .find_by_user(notification.user_id)
            .await?
        {
            Some(settings) => channels::resolve(&settings, &notification, now.time()),
            None => {
                tracing::warn!(
                    user_id = notification.user_id,
                    "No notification settings, in-app delivery only"
                );
                DeliveryPlan::default()
            }
        };

        tracing::info!(
            notification_id = notification.id,
            user_id = notification.user_id,
            kind = ?notification.notification_type,
            email = delivery.email,
            push = delivery.push,
            sms = delivery.sms,
            quiet_hours = delivery.quiet_hours,
            "Notification created"
        );

        Ok(CreatedNotification {
            notification,
            delivery,
        })
    }

    /// Reminder for a freshly scheduled lesson.
    pub async fn lesson_reminder(
        &self,
        user_id: i32,
        lesson: &lesson::Model,
    ) -> ServiceResult<CreatedNotification> {
        self.create(
            NewNotification::new(
                user_id,
                "Lesson reminder",
                format!(
                    "Lesson '{}' starts on {}",
                    lesson.title,
                    lesson.start_time.format("%d.%m.%Y at %H:%M")
                ),
            )
            .kind(NotificationType::LessonReminder)
            .related("lesson", lesson.id)
            .action_url(format!("/schedule/{}", lesson.id))
            .priority(3)
            .actionable(),
        )
        .await
    }

    pub async fn lesson_cancelled(
        &self,
        user_id: i32,
        cancelled_by: &str,
        lesson: &lesson::Model,
    ) -> ServiceResult<CreatedNotification> {
        self.create(
            NewNotification::new(
                user_id,
                "Lesson cancelled",
                format!(
                    "{} cancelled the lesson '{}' planned for {}",
                    cancelled_by,
                    lesson.title,
                    lesson.start_time.format("%d.%m.%Y at %H:%M")
                ),
            )
            .kind(NotificationType::LessonCancelled)
            .related("lesson", lesson.id)
            .action_url(format!("/schedule/{}", lesson.id))
            .priority(2),
        )
        .await
    }

    pub async fn homework_assigned(
        &self,
        homework: &homework::Model,
    ) -> ServiceResult<CreatedNotification> {
        self.create(
            NewNotification::new(
                homework.student_id,
                "New homework",
                format!(
                    "You have been assigned '{}', due {}",
                    homework.title,
                    homework.due_date.format("%d.%m.%Y %H:%M")
                ),
            )
            .kind(NotificationType::HomeworkAssigned)
            .related("homework", homework.id)
            .action_url(format!("/homework/{}", homework.id))
            .priority(2)
            .actionable(),
        )
        .await
    }

    /// Tells the assigned teacher that a student handed the work in.
    pub async fn homework_submitted(
        &self,
        student_username: &str,
        homework: &homework::Model,
    ) -> ServiceResult<CreatedNotification> {
        self.create(
            NewNotification::new(
                homework.teacher_id,
                "Homework submitted",
                format!(
                    "Student {} submitted homework: {}",
                    student_username, homework.title
                ),
            )
            .kind(NotificationType::HomeworkSubmitted)
            .related("homework", homework.id)
            .action_url(format!("/homework/review/{}", homework.id)),
        )
        .await
    }

    pub async fn list(
        &self,
        user_id: i32,
        limit: u64,
        offset: u64,
        unread_only: bool,
    ) -> ServiceResult<NotificationPage> {
        let limit = limit.clamp(1, NOTIFICATION_PAGE_LIMIT);
        // SQL offsets are signed 64-bit
        let offset = offset.min(i64::MAX as u64);
        let (notifications, total) = NotificationRepository::new(self.db)
            .list_for_user(user_id, limit, offset, unread_only)
            .await?;

        let has_more = total > offset.saturating_add(notifications.len() as u64);

        Ok(NotificationPage {
            notifications,
            total,
            has_more,
        })
    }

    pub async fn unread_count(&self, user_id: i32) -> ServiceResult<u64> {
        Ok(NotificationRepository::new(self.db)
            .count_unread(user_id)
            .await?)
    }

    async fn find_owned(
        &self,
        user_id: i32,
        notification_id: i32,
    ) -> ServiceResult<notification::Model> {
        NotificationRepository::new(self.db)
            .find_for_user(notification_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Notification not found".to_string()))
    }

    /// Only unread rows change; `read_at` is written once.
    pub async fn mark_read(
        &self,
        user_id: i32,
        notification_id: i32,
    ) -> ServiceResult<notification::Model> {
        let notification = self.find_owned(user_id, notification_id).await?;

        if notification.status != NotificationStatus::Unread {
            return Ok(notification);
        }

        Ok(NotificationRepository::new(self.db)
            .mark_read(notification, Utc::now().naive_utc())
            .await?)
    }

    pub async fn mark_all_read(&self, user_id: i32) -> ServiceResult<u64> {
        let updated = NotificationRepository::new(self.db)
            .mark_all_read(user_id, Utc::now().naive_utc())
            .await?;

        tracing::debug!(user_id, updated, "Marked all notifications as read");
        Ok(updated)
    }

    pub async fn archive(
        &self,
        user_id: i32,
        notification_id: i32,
    ) -> ServiceResult<notification::Model> {
        let notification = self.find_owned(user_id, notification_id).await?;

        if notification.status == NotificationStatus::Archived {
            return Ok(notification);
        }

        Ok(NotificationRepository::new(self.db)
            .archive(notification)
            .await?)
    }

    pub async fn delete(&self, user_id: i32, notification_id: i32) -> ServiceResult<()> {
        let notification = self.find_owned(user_id, notification_id).await?;
        NotificationRepository::new(self.db)
            .delete(notification)
            .await?;
        Ok(())
    }

    /// Settings row of the user, created with defaults if it is missing.
    pub async fn settings(&self, user_id: i32) -> ServiceResult<notification_settings::Model> {
        let repo = NotificationSettingsRepository::new(self.db);

        if let Some(settings) = repo.find_by_user(user_id).await? {
            return Ok(settings);
        }

        Ok(repo.create_default(user_id).await?)
    }

    pub async fn update_settings(
        &self,
        user_id: i32,
        updates: SettingsUpdate,
    ) -> ServiceResult<notification_settings::Model> {
        for value in [&updates.quiet_start, &updates.quiet_end].into_iter().flatten() {
            parse_time(value).map_err(ServiceError::Validation)?;
        }
        if updates.lesson_reminder_hours.is_some_and(|h| h < 0)
            || updates.homework_reminder_days.is_some_and(|d| d < 0)
        {
            return Err(ServiceError::Validation(
                "Reminder lead times cannot be negative".to_string(),
            ));
        }

        let settings = self.settings(user_id).await?;
        Ok(NotificationSettingsRepository::new(self.db)
            .update(settings, updates)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{LessonRepository, NewLesson};
    use crate::test_utils::{create_user, setup_test_db};
    use chrono::Duration;

    #[tokio::test]
    async fn create_uses_defaults_and_never_deduplicates() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let manager = NotificationManager::new(&db);

        let first = manager
            .create(NewNotification::new(user.id, "Hello", "Welcome"))
            .await
            .unwrap()
            .notification;
        let second = manager
            .create(NewNotification::new(user.id, "Hello", "Welcome"))
            .await
            .unwrap()
            .notification;

        assert_ne!(first.id, second.id);
        assert_eq!(first.status, NotificationStatus::Unread);
        assert_eq!(first.notification_type, NotificationType::SystemMessage);
        assert_eq!(first.priority, 1);
        assert!(!first.is_actionable);
        assert!(first.read_at.is_none());
        assert!(first.related_entity_type.is_none());
        assert_eq!(manager.unread_count(user.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn priority_is_clamped() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let manager = NotificationManager::new(&db);

        let high = manager
            .create(NewNotification::new(user.id, "a", "b").priority(9))
            .await
            .unwrap();
        let low = manager
            .create(NewNotification::new(user.id, "a", "b").priority(-2))
            .await
            .unwrap();

        assert_eq!(high.notification.priority, MAX_PRIORITY);
        assert_eq!(low.notification.priority, MIN_PRIORITY);
    }

    #[tokio::test]
    async fn lesson_reminder_links_back_to_the_lesson() {
        let (db, _dir) = setup_test_db().await;
        let student = create_user(&db, "student", false).await;
        let teacher = create_user(&db, "teacher", true).await;
        let start = Utc::now().naive_utc() + Duration::hours(1);
        let lesson = LessonRepository::new(&db)
            .create(NewLesson {
                student_id: student.id,
                teacher_id: teacher.id,
                title: "Algebra".to_string(),
                description: None,
                start_time: start,
                end_time: start + Duration::minutes(60),
            })
            .await
            .unwrap();

        let created = NotificationManager::new(&db)
            .lesson_reminder(student.id, &lesson)
            .await
            .unwrap();
        let n = created.notification;

        assert_eq!(n.title, "Lesson reminder");
        assert_eq!(n.notification_type, NotificationType::LessonReminder);
        assert_eq!(n.related_entity_type.as_deref(), Some("lesson"));
        assert_eq!(n.related_entity_id, Some(lesson.id));
        assert_eq!(n.action_url, Some(format!("/schedule/{}", lesson.id)));
        assert_eq!(n.priority, 3);
        assert!(n.is_actionable);
        assert!(created.delivery.email);
    }

    #[tokio::test]
    async fn mark_read_sets_read_at_once() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let manager = NotificationManager::new(&db);
        let created = manager
            .create(NewNotification::new(user.id, "t", "m"))
            .await
            .unwrap()
            .notification;

        let first = manager.mark_read(user.id, created.id).await.unwrap();
        assert_eq!(first.status, NotificationStatus::Read);
        let read_at = first.read_at.expect("read_at set");

        let again = manager.mark_read(user.id, created.id).await.unwrap();
        assert_eq!(again.status, NotificationStatus::Read);
        assert_eq!(again.read_at, Some(read_at));
        assert_eq!(manager.unread_count(user.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn foreign_notifications_are_not_found() {
        let (db, _dir) = setup_test_db().await;
        let owner = create_user(&db, "owner", false).await;
        let other = create_user(&db, "other", false).await;
        let manager = NotificationManager::new(&db);
        let created = manager
            .create(NewNotification::new(owner.id, "t", "m"))
            .await
            .unwrap()
            .notification;

        for result in [
            manager.mark_read(other.id, created.id).await.map(|_| ()),
            manager.archive(other.id, created.id).await.map(|_| ()),
            manager.delete(other.id, created.id).await,
            manager.delete(owner.id, created.id + 100).await,
        ] {
            assert!(matches!(result, Err(ServiceError::NotFound(_))));
        }

        // Still there and untouched for the owner
        let page = manager.list(owner.id, 20, 0, false).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.notifications[0].status, NotificationStatus::Unread);
    }

    #[tokio::test]
    async fn mark_all_read_only_touches_own_unread_rows() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let other = create_user(&db, "bob", false).await;
        let manager = NotificationManager::new(&db);

        for _ in 0..3 {
            manager
                .create(NewNotification::new(user.id, "t", "m"))
                .await
                .unwrap();
        }
        manager
            .create(NewNotification::new(other.id, "t", "m"))
            .await
            .unwrap();

        assert_eq!(manager.mark_all_read(user.id).await.unwrap(), 3);
        assert_eq!(manager.mark_all_read(user.id).await.unwrap(), 0);
        assert_eq!(manager.unread_count(other.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_pages_newest_first() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let manager = NotificationManager::new(&db);

        for i in 0..5 {
            manager
                .create(NewNotification::new(user.id, format!("n{}", i), "m"))
                .await
                .unwrap();
        }
        let newest = manager.list(user.id, 2, 0, false).await.unwrap();
        assert_eq!(newest.total, 5);
        assert!(newest.has_more);
        assert_eq!(newest.notifications[0].title, "n4");

        let tail = manager.list(user.id, 2, 4, false).await.unwrap();
        assert_eq!(tail.notifications.len(), 1);
        assert!(!tail.has_more);

        let first = newest.notifications[0].id;
        manager.mark_read(user.id, first).await.unwrap();
        let unread = manager.list(user.id, 20, 0, true).await.unwrap();
        assert_eq!(unread.total, 4);
    }

    #[tokio::test]
    async fn offset_past_the_end_is_an_empty_last_page() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let manager = NotificationManager::new(&db);
        manager
            .create(NewNotification::new(user.id, "t", "m"))
            .await
            .unwrap();

        for offset in [1, i64::MAX as u64, u64::MAX] {
            let page = manager.list(user.id, 20, offset, false).await.unwrap();
            assert_eq!(page.total, 1);
            assert!(page.notifications.is_empty());
            assert!(!page.has_more, "{offset}");
        }
    }

    #[tokio::test]
    async fn archive_and_delete_owned_rows() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let manager = NotificationManager::new(&db);
        let n = manager
            .create(NewNotification::new(user.id, "t", "m"))
            .await
            .unwrap()
            .notification;

        let archived = manager.archive(user.id, n.id).await.unwrap();
        assert_eq!(archived.status, NotificationStatus::Archived);

        manager.delete(user.id, n.id).await.unwrap();
        assert_eq!(manager.list(user.id, 20, 0, false).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn second_settings_row_is_a_unique_violation() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;

        let err: ServiceError = NotificationSettingsRepository::new(&db)
            .create_default(user.id)
            .await
            .unwrap_err()
            .into();

        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn settings_update_validates_and_persists() {
        let (db, _dir) = setup_test_db().await;
        let user = create_user(&db, "alice", false).await;
        let manager = NotificationManager::new(&db);

        let bad = manager
            .update_settings(
                user.id,
                SettingsUpdate {
                    quiet_start: Some("25:99".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));

        let updated = manager
            .update_settings(
                user.id,
                SettingsUpdate {
                    push_enabled: Some(false),
                    quiet_start: Some("23:00".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.push_enabled);
        assert_eq!(updated.quiet_start, "23:00");
        assert!(updated.email_enabled);
    }
}
