use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::config::DASHBOARD_ITEMS;
use crate::entities::{homework, lesson, user};
use crate::error::ServiceResult;
use crate::notifications::NotificationManager;
use crate::repositories::{HomeworkRepository, LessonRepository};

pub struct Dashboard {
    pub upcoming_lessons: Vec<lesson::Model>,
    pub recent_homework: Vec<homework::Model>,
    pub unread_notifications: u64,
}

/// Teachers see the lessons they teach and the homework they assigned.
pub async fn overview(db: &DatabaseConnection, user: &user::Model) -> ServiceResult<Dashboard> {
    let upcoming_lessons = LessonRepository::new(db)
        .list_future(
            user.id,
            user.is_teacher,
            Utc::now().naive_utc(),
            Some(DASHBOARD_ITEMS),
        )
        .await?;
    let recent_homework = HomeworkRepository::new(db)
        .list_recent(user.id, user.is_teacher, DASHBOARD_ITEMS)
        .await?;
    let unread_notifications = NotificationManager::new(db).unread_count(user.id).await?;

    Ok(Dashboard {
        upcoming_lessons,
        recent_homework,
        unread_notifications,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{NewHomework, NewLesson};
    use crate::test_utils::{create_user, setup_test_db};
    use chrono::Duration;

    #[tokio::test]
    async fn limits_and_orders_each_section() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let now = Utc::now().naive_utc();

        for day in 1..=7 {
            let start = now + Duration::days(day);
            LessonRepository::new(&db)
                .create(NewLesson {
                    student_id: student.id,
                    teacher_id: teacher.id,
                    title: format!("Lesson {}", day),
                    description: None,
                    start_time: start,
                    end_time: start + Duration::hours(1),
                })
                .await
                .unwrap();
            HomeworkRepository::new(&db)
                .create(NewHomework {
                    student_id: student.id,
                    teacher_id: teacher.id,
                    title: format!("Homework {}", day),
                    description: None,
                    due_date: now + Duration::days(day),
                })
                .await
                .unwrap();
        }

        let student_view = overview(&db, &student).await.unwrap();
        assert_eq!(student_view.upcoming_lessons.len(), 5);
        assert_eq!(student_view.upcoming_lessons[0].title, "Lesson 1");
        assert_eq!(student_view.recent_homework.len(), 5);
        assert_eq!(student_view.recent_homework[0].title, "Homework 7");

        let teacher_view = overview(&db, &teacher).await.unwrap();
        assert_eq!(teacher_view.upcoming_lessons.len(), 5);
        assert_eq!(teacher_view.recent_homework.len(), 5);

        let outsider = create_user(&db, "outsider", false).await;
        let empty = overview(&db, &outsider).await.unwrap();
        assert!(empty.upcoming_lessons.is_empty());
        assert!(empty.recent_homework.is_empty());
        assert_eq!(empty.unread_notifications, 0);
    }
}
