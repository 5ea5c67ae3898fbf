use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{
    notification, notification_settings,
    sea_orm_active_enums::{NotificationStatus, NotificationType},
};
use crate::notifications::NotificationPage;
use crate::repositories::SettingsUpdate;

fn default_limit() -> u64 {
    20
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationListQuery {
    /// Clamped to 1..=100
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub title: String,
    pub message: String,
    pub notification_type: NotificationType,
    pub status: NotificationStatus,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<i32>,
    pub priority: i16,
    pub is_actionable: bool,
    pub action_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub read_at: Option<NaiveDateTime>,
    pub expires_at: Option<NaiveDateTime>,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            notification_type: n.notification_type,
            status: n.status,
            related_entity_type: n.related_entity_type,
            related_entity_id: n.related_entity_id,
            priority: n.priority,
            is_actionable: n.is_actionable,
            action_url: n.action_url,
            created_at: n.created_at,
            read_at: n.read_at,
            expires_at: n.expires_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub total: u64,
    pub has_more: bool,
}

impl From<NotificationPage> for NotificationListResponse {
    fn from(page: NotificationPage) -> Self {
        Self {
            notifications: page.notifications.into_iter().map(Into::into).collect(),
            total: page.total,
            has_more: page.has_more,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationSettingsResponse {
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
    #[schema(example = "22:00")]
    pub quiet_start: String,
    #[schema(example = "08:00")]
    pub quiet_end: String,
}

impl From<notification_settings::Model> for NotificationSettingsResponse {
    fn from(s: notification_settings::Model) -> Self {
        Self {
            email_enabled: s.email_enabled,
            email_homework: s.email_homework,
            email_lessons: s.email_lessons,
            email_system: s.email_system,
            email_promotions: s.email_promotions,
            push_enabled: s.push_enabled,
            push_homework: s.push_homework,
            push_lessons: s.push_lessons,
            push_system: s.push_system,
            sms_enabled: s.sms_enabled,
            sms_lessons_reminder: s.sms_lessons_reminder,
            sms_important: s.sms_important,
            lesson_reminder_hours: s.lesson_reminder_hours,
            homework_reminder_days: s.homework_reminder_days,
            quiet_start: s.quiet_start,
            quiet_end: s.quiet_end,
        }
    }
}

/// Omitted fields keep their stored value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateNotificationSettingsRequest {
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
    #[schema(example = "23:00")]
    pub quiet_start: Option<String>,
    #[schema(example = "07:00")]
    pub quiet_end: Option<String>,
}

impl From<UpdateNotificationSettingsRequest> for SettingsUpdate {
    fn from(req: UpdateNotificationSettingsRequest) -> Self {
        Self {
            email_enabled: req.email_enabled,
            email_homework: req.email_homework,
            email_lessons: req.email_lessons,
            email_system: req.email_system,
            email_promotions: req.email_promotions,
            push_enabled: req.push_enabled,
            push_homework: req.push_homework,
            push_lessons: req.push_lessons,
            push_system: req.push_system,
            sms_enabled: req.sms_enabled,
            sms_lessons_reminder: req.sms_lessons_reminder,
            sms_important: req.sms_important,
            lesson_reminder_hours: req.lesson_reminder_hours,
            homework_reminder_days: req.homework_reminder_days,
            quiet_start: req.quiet_start,
            quiet_end: req.quiet_end,
        }
    }
}
