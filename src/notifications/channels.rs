use chrono::NaiveTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{
    notification, notification_settings, sea_orm_active_enums::NotificationType,
};
use crate::utils::validators::parse_time;

/// Priority at or above which a notification counts as important.
pub const IMPORTANT_PRIORITY: i16 = 4;

/// Channels a notification is eligible for under the owner's settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeliveryPlan {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
    /// Push and SMS were held back because of quiet hours.
    pub quiet_hours: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Homework,
    Lessons,
    System,
    Promotions,
}

fn category_of(notification_type: NotificationType) -> Category {
    match notification_type {
        NotificationType::HomeworkAssigned
        | NotificationType::HomeworkSubmitted
        | NotificationType::HomeworkReviewed => Category::Homework,
        NotificationType::LessonScheduled
        | NotificationType::LessonCancelled
        | NotificationType::LessonReminder => Category::Lessons,
        NotificationType::KnowledgeUpdate => Category::Promotions,
        NotificationType::SystemMessage
        | NotificationType::AiAssistant
        | NotificationType::Payment
        | NotificationType::Other => Category::System,
    }
}

/// Whether `now` falls in `[start, end)`. Windows may wrap past midnight.
pub fn in_quiet_hours(start: NaiveTime, end: NaiveTime, now: NaiveTime) -> bool {
    if start == end {
        false
    } else if start < end {
        start <= now && now < end
    } else {
        now >= start || now < end
    }
}

pub fn resolve(
    settings: &notification_settings::Model,
    notification: &notification::Model,
    now: NaiveTime,
) -> DeliveryPlan {
    let category = category_of(notification.notification_type);
    let important = notification.priority >= IMPORTANT_PRIORITY;

    let email = settings.email_enabled
        && match category {
            Category::Homework => settings.email_homework,
            Category::Lessons => settings.email_lessons,
            Category::System => settings.email_system,
            Category::Promotions => settings.email_promotions,
        };

    let push = settings.push_enabled
        && match category {
            Category::Homework => settings.push_homework,
            Category::Lessons => settings.push_lessons,
            Category::System => settings.push_system,
            Category::Promotions => false,
        };

    let sms = settings.sms_enabled
        && ((notification.notification_type == NotificationType::LessonReminder
            && settings.sms_lessons_reminder)
            || (important && settings.sms_important));

    // Unparseable quiet hours behave like no quiet window at all
    let quiet = match (
        parse_time(&settings.quiet_start),
        parse_time(&settings.quiet_end),
    ) {
        (Ok(start), Ok(end)) => in_quiet_hours(start, end, now),
        _ => false,
    };

    if quiet && (push || sms) {
        DeliveryPlan {
            email,
            push: false,
            sms: false,
            quiet_hours: true,
        }
    } else {
        DeliveryPlan {
            email,
            push,
            sms,
            quiet_hours: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::NotificationStatus;
    use chrono::NaiveDate;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn settings() -> notification_settings::Model {
        notification_settings::Model {
            id: 1,
            user_id: 1,
            email_enabled: true,
            email_homework: true,
            email_lessons: true,
            email_system: true,
            email_promotions: false,
            push_enabled: true,
            push_homework: true,
            push_lessons: true,
            push_system: true,
            sms_enabled: false,
            sms_lessons_reminder: false,
            sms_important: true,
            lesson_reminder_hours: 1,
            homework_reminder_days: 1,
            quiet_start: "22:00".to_string(),
            quiet_end: "08:00".to_string(),
        }
    }

    fn notification(notification_type: NotificationType, priority: i16) -> notification::Model {
        notification::Model {
            id: 1,
            user_id: 1,
            title: "t".to_string(),
            message: "m".to_string(),
            notification_type,
            status: NotificationStatus::Unread,
            related_entity_type: None,
            related_entity_id: None,
            priority,
            is_actionable: false,
            action_url: None,
            created_at: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            read_at: None,
            expires_at: None,
        }
    }

    #[test]
    fn quiet_window_wraps_midnight() {
        assert!(in_quiet_hours(time(22, 0), time(8, 0), time(23, 30)));
        assert!(in_quiet_hours(time(22, 0), time(8, 0), time(7, 59)));
        assert!(!in_quiet_hours(time(22, 0), time(8, 0), time(8, 0)));
        assert!(!in_quiet_hours(time(22, 0), time(8, 0), time(12, 0)));
        assert!(in_quiet_hours(time(13, 0), time(14, 0), time(13, 30)));
        assert!(!in_quiet_hours(time(9, 0), time(9, 0), time(9, 0)));
    }

    #[test]
    fn default_settings_allow_email_and_push_during_the_day() {
        let plan = resolve(
            &settings(),
            &notification(NotificationType::LessonReminder, 3),
            time(12, 0),
        );
        assert_eq!(
            plan,
            DeliveryPlan {
                email: true,
                push: true,
                sms: false,
                quiet_hours: false
            }
        );
    }

    #[test]
    fn category_flags_gate_each_channel() {
        let mut s = settings();
        s.email_homework = false;
        s.push_homework = false;

        let plan = resolve(
            &s,
            &notification(NotificationType::HomeworkSubmitted, 1),
            time(12, 0),
        );
        assert!(!plan.email);
        assert!(!plan.push);

        let promo = resolve(
            &settings(),
            &notification(NotificationType::KnowledgeUpdate, 1),
            time(12, 0),
        );
        assert!(!promo.email);
        assert!(!promo.push);
    }

    #[test]
    fn sms_needs_master_switch_and_a_reason() {
        let mut s = settings();
        s.sms_enabled = true;

        let low = resolve(&s, &notification(NotificationType::SystemMessage, 1), time(12, 0));
        assert!(!low.sms);

        let important = resolve(&s, &notification(NotificationType::SystemMessage, 5), time(12, 0));
        assert!(important.sms);

        s.sms_lessons_reminder = true;
        let reminder = resolve(&s, &notification(NotificationType::LessonReminder, 1), time(12, 0));
        assert!(reminder.sms);
    }

    #[test]
    fn quiet_hours_hold_push_and_sms_but_not_email() {
        let mut s = settings();
        s.sms_enabled = true;

        let plan = resolve(&s, &notification(NotificationType::SystemMessage, 5), time(23, 0));
        assert_eq!(
            plan,
            DeliveryPlan {
                email: true,
                push: false,
                sms: false,
                quiet_hours: true
            }
        );
    }

    #[test]
    fn malformed_quiet_hours_are_ignored() {
        let mut s = settings();
        s.quiet_start = "late".to_string();

        let plan = resolve(&s, &notification(NotificationType::SystemMessage, 1), time(23, 0));
        assert!(plan.push);
        assert!(!plan.quiet_hours);
    }
}
