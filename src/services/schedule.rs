use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::entities::{lesson, recurring_lesson, user};
use crate::error::{ServiceError, ServiceResult};
use crate::lifecycle::{LessonAction, lesson::next_status};
use crate::notifications::NotificationManager;
use crate::repositories::{LessonRepository, NewLesson, NewRecurringLesson, UserRepository};
use crate::utils::validators::{
    add_days, add_minutes, lookahead_end, parse_date, parse_date_time, parse_time,
};

pub const DEFAULT_DURATION_MINUTES: i32 = 60;

pub struct LessonInput {
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub start_time: String,
    pub duration_minutes: i32,
    pub teacher_id: i32,
}

pub struct RecurringLessonInput {
    pub title: String,
    pub description: Option<String>,
    pub day_of_week: i16,
    pub start_time: String,
    pub duration_minutes: i32,
    pub teacher_id: i32,
}

pub struct DaySchedule {
    pub date: NaiveDate,
    pub lessons: Vec<lesson::Model>,
    pub recurring: Vec<recurring_lesson::Model>,
}

pub struct ManagedSchedule {
    pub lessons: Vec<lesson::Model>,
    pub recurring: Vec<recurring_lesson::Model>,
}

fn check_title(title: &str) -> ServiceResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServiceError::Validation("Title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

fn check_duration(duration_minutes: i32) -> ServiceResult<()> {
    if duration_minutes <= 0 {
        return Err(ServiceError::Validation(
            "Duration must be a positive number of minutes".to_string(),
        ));
    }
    Ok(())
}

async fn check_teacher(db: &DatabaseConnection, teacher_id: i32) -> ServiceResult<user::Model> {
    UserRepository::new(db)
        .find_by_id(teacher_id)
        .await?
        .ok_or_else(|| ServiceError::Validation(format!("Teacher {} does not exist", teacher_id)))
}

/// Lessons of `student` starting on `date` (today when absent) plus the
/// active recurring slots.
pub async fn day_view(
    db: &DatabaseConnection,
    student: &user::Model,
    date: Option<&str>,
) -> ServiceResult<DaySchedule> {
    let date = match date {
        Some(value) => parse_date(value).map_err(ServiceError::Validation)?,
        None => Utc::now().date_naive(),
    };
    let start_of_day = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let end_of_day = add_days(start_of_day, 1).map_err(ServiceError::Validation)?;

    let repo = LessonRepository::new(db);
    let lessons = repo
        .list_for_student_between(student.id, start_of_day, end_of_day)
        .await?;
    let recurring = repo.list_recurring_for_student(student.id, true).await?;

    Ok(DaySchedule {
        date,
        lessons,
        recurring,
    })
}

pub async fn manage_view(
    db: &DatabaseConnection,
    student: &user::Model,
) -> ServiceResult<ManagedSchedule> {
    let repo = LessonRepository::new(db);
    let lessons = repo
        .list_future(student.id, false, Utc::now().naive_utc(), None)
        .await?;
    let recurring = repo.list_recurring_for_student(student.id, false).await?;

    Ok(ManagedSchedule { lessons, recurring })
}

/// Books a planned lesson for `student` and drops a reminder into their
/// notifications right away.
pub async fn create_lesson(
    db: &DatabaseConnection,
    student: &user::Model,
    input: LessonInput,
) -> ServiceResult<lesson::Model> {
    let title = check_title(&input.title)?;
    check_duration(input.duration_minutes)?;
    let start_time = parse_date_time(&input.date, &input.start_time)
        .map_err(ServiceError::Validation)?;
    let end_time =
        add_minutes(start_time, input.duration_minutes.into()).map_err(ServiceError::Validation)?;
    check_teacher(db, input.teacher_id).await?;

    let lesson = LessonRepository::new(db)
        .create(NewLesson {
            student_id: student.id,
            teacher_id: input.teacher_id,
            title,
            description: input.description,
            start_time,
            end_time,
        })
        .await?;

    tracing::info!(
        lesson_id = lesson.id,
        student_id = student.id,
        teacher_id = lesson.teacher_id,
        start_time = %lesson.start_time,
        "Lesson scheduled"
    );

    NotificationManager::new(db)
        .lesson_reminder(student.id, &lesson)
        .await?;

    Ok(lesson)
}

pub async fn get_lesson(
    db: &DatabaseConnection,
    user: &user::Model,
    lesson_id: i32,
) -> ServiceResult<lesson::Model> {
    LessonRepository::new(db)
        .find_for_participant(lesson_id, user.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Lesson not found".to_string()))
}

/// Applies `action` for either participant. Repeating an action succeeds
/// without touching the row. A real cancellation notifies the other side.
pub async fn transition_lesson(
    db: &DatabaseConnection,
    user: &user::Model,
    lesson_id: i32,
    action: LessonAction,
) -> ServiceResult<lesson::Model> {
    let lesson = get_lesson(db, user, lesson_id).await?;

    let Some(next) = next_status(lesson.status, action)? else {
        return Ok(lesson);
    };

    let from = lesson.status;
    let lesson = LessonRepository::new(db).update_status(lesson, next).await?;

    tracing::info!(
        lesson_id = lesson.id,
        user_id = user.id,
        from = ?from,
        to = ?lesson.status,
        "Lesson status changed"
    );

    if action == LessonAction::Cancel {
        NotificationManager::new(db)
            .lesson_cancelled(lesson.counterpart_of(user.id), &user.username, &lesson)
            .await?;
    }

    Ok(lesson)
}

/// Planned lessons starting within the next `days` days.
pub async fn upcoming_lessons(
    db: &DatabaseConnection,
    student: &user::Model,
    days: i64,
) -> ServiceResult<Vec<lesson::Model>> {
    upcoming_lessons_from(db, student, days, Utc::now().naive_utc()).await
}

async fn upcoming_lessons_from(
    db: &DatabaseConnection,
    student: &user::Model,
    days: i64,
    now: NaiveDateTime,
) -> ServiceResult<Vec<lesson::Model>> {
    let until = lookahead_end(now, days).map_err(ServiceError::Validation)?;

    Ok(LessonRepository::new(db)
        .list_upcoming_planned(student.id, now, until)
        .await?)
}

pub async fn create_recurring(
    db: &DatabaseConnection,
    student: &user::Model,
    input: RecurringLessonInput,
) -> ServiceResult<recurring_lesson::Model> {
    let title = check_title(&input.title)?;
    if !(0..=6).contains(&input.day_of_week) {
        return Err(ServiceError::Validation(
            "day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string(),
        ));
    }
    check_duration(input.duration_minutes)?;
    let start_time = parse_time(&input.start_time).map_err(ServiceError::Validation)?;
    check_teacher(db, input.teacher_id).await?;

    Ok(LessonRepository::new(db)
        .create_recurring(NewRecurringLesson {
            student_id: student.id,
            teacher_id: input.teacher_id,
            title,
            description: input.description,
            day_of_week: input.day_of_week,
            start_time: start_time.format("%H:%M").to_string(),
            duration_minutes: input.duration_minutes,
        })
        .await?)
}

pub async fn toggle_recurring(
    db: &DatabaseConnection,
    student: &user::Model,
    recurring_id: i32,
) -> ServiceResult<recurring_lesson::Model> {
    let repo = LessonRepository::new(db);
    let recurring = repo
        .find_recurring_for_student(recurring_id, student.id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Recurring lesson not found".to_string()))?;

    let is_active = !recurring.is_active;
    Ok(repo.set_recurring_active(recurring, is_active).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_LOOKAHEAD_DAYS;
    use crate::entities::{notification, sea_orm_active_enums::LessonStatus};
    use chrono::Duration;
    use crate::test_utils::{create_user, setup_test_db};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    fn lesson_input(teacher_id: i32, start: NaiveDateTime) -> LessonInput {
        LessonInput {
            title: "Algebra".to_string(),
            description: Some("Quadratic equations".to_string()),
            date: start.format("%Y-%m-%d").to_string(),
            start_time: start.format("%H:%M").to_string(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            teacher_id,
        }
    }

    async fn notifications_of(db: &DatabaseConnection, user_id: i32) -> Vec<notification::Model> {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .all(db)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn creating_a_lesson_sends_one_reminder_to_the_student() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let start = Utc::now().naive_utc() + Duration::hours(1);

        let lesson = create_lesson(&db, &student, lesson_input(teacher.id, start))
            .await
            .unwrap();

        assert_eq!(lesson.status, LessonStatus::Planned);
        assert!(lesson.end_time > lesson.start_time);

        let sent = notifications_of(&db, student.id).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Lesson reminder");
        assert_eq!(sent[0].related_entity_type.as_deref(), Some("lesson"));
        assert_eq!(sent[0].related_entity_id, Some(lesson.id));
        assert!(notifications_of(&db, teacher.id).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_lesson_input_is_rejected() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let start = Utc::now().naive_utc() + Duration::days(1);

        let mut bad_date = lesson_input(teacher.id, start);
        bad_date.date = "31/12/2026".to_string();
        let mut bad_duration = lesson_input(teacher.id, start);
        bad_duration.duration_minutes = 0;
        let unknown_teacher = lesson_input(teacher.id + 100, start);

        for input in [bad_date, bad_duration, unknown_teacher] {
            assert!(matches!(
                create_lesson(&db, &student, input).await,
                Err(ServiceError::Validation(_))
            ));
        }
        assert!(notifications_of(&db, student.id).await.is_empty());
    }

    #[tokio::test]
    async fn repeated_cancel_and_complete_are_harmless() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let start = Utc::now().naive_utc() + Duration::hours(2);

        let first = create_lesson(&db, &student, lesson_input(teacher.id, start))
            .await
            .unwrap();
        let cancelled = transition_lesson(&db, &student, first.id, LessonAction::Cancel)
            .await
            .unwrap();
        let again = transition_lesson(&db, &student, first.id, LessonAction::Cancel)
            .await
            .unwrap();
        assert_eq!(cancelled.status, LessonStatus::Cancelled);
        assert_eq!(again, cancelled);
        // Only the real cancellation notified the teacher
        assert_eq!(notifications_of(&db, teacher.id).await.len(), 1);

        let second = create_lesson(&db, &student, lesson_input(teacher.id, start))
            .await
            .unwrap();
        let done = transition_lesson(&db, &teacher, second.id, LessonAction::Complete)
            .await
            .unwrap();
        let done_again = transition_lesson(&db, &teacher, second.id, LessonAction::Complete)
            .await
            .unwrap();
        assert_eq!(done.status, LessonStatus::Completed);
        assert_eq!(done_again.status, LessonStatus::Completed);

        // Terminal states do not cross over
        assert!(matches!(
            transition_lesson(&db, &student, second.id, LessonAction::Cancel).await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            transition_lesson(&db, &student, first.id, LessonAction::Complete).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn outsiders_cannot_see_or_change_lessons() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let outsider = create_user(&db, "outsider", false).await;
        let start = Utc::now().naive_utc() + Duration::hours(2);
        let lesson = create_lesson(&db, &student, lesson_input(teacher.id, start))
            .await
            .unwrap();

        assert!(matches!(
            get_lesson(&db, &outsider, lesson.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            transition_lesson(&db, &outsider, lesson.id, LessonAction::Cancel).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(get_lesson(&db, &teacher, lesson.id).await.unwrap().id, lesson.id);
    }

    #[tokio::test]
    async fn upcoming_only_lists_planned_lessons_in_window() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let now = Utc::now().naive_utc();

        let soon = create_lesson(&db, &student, lesson_input(teacher.id, now + Duration::days(1)))
            .await
            .unwrap();
        let cancelled =
            create_lesson(&db, &student, lesson_input(teacher.id, now + Duration::days(2)))
                .await
                .unwrap();
        create_lesson(&db, &student, lesson_input(teacher.id, now + Duration::days(30)))
            .await
            .unwrap();
        transition_lesson(&db, &student, cancelled.id, LessonAction::Cancel)
            .await
            .unwrap();

        let upcoming = upcoming_lessons_from(&db, &student, 7, now).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, soon.id);
    }

    #[tokio::test]
    async fn upcoming_window_outside_range_is_rejected() {
        let (db, _dir) = setup_test_db().await;
        let student = create_user(&db, "student", false).await;
        let now = Utc::now().naive_utc();

        for days in [-1, MAX_LOOKAHEAD_DAYS + 1, 1_000_000_000, i64::MAX] {
            assert!(
                matches!(
                    upcoming_lessons_from(&db, &student, days, now).await,
                    Err(ServiceError::Validation(_))
                ),
                "{days}"
            );
        }
        assert!(
            upcoming_lessons_from(&db, &student, MAX_LOOKAHEAD_DAYS, now)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn dates_at_the_calendar_edge_are_rejected() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let last_day = NaiveDate::MAX.format("%Y-%m-%d").to_string();

        let mut input = lesson_input(teacher.id, Utc::now().naive_utc());
        input.date = last_day.clone();
        input.start_time = "23:30".to_string();
        assert!(matches!(
            create_lesson(&db, &student, input).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            day_view(&db, &student, Some(&last_day)).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(notifications_of(&db, student.id).await.is_empty());
    }

    #[tokio::test]
    async fn day_view_and_recurring_toggle() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let start = Utc::now().naive_utc() + Duration::days(3);
        create_lesson(&db, &student, lesson_input(teacher.id, start))
            .await
            .unwrap();

        let recurring = create_recurring(
            &db,
            &student,
            RecurringLessonInput {
                title: "Physics".to_string(),
                description: None,
                day_of_week: 2,
                start_time: "09:30".to_string(),
                duration_minutes: 45,
                teacher_id: teacher.id,
            },
        )
        .await
        .unwrap();
        assert!(recurring.is_active);
        assert_eq!(recurring.start_time, "09:30");

        let date = start.format("%Y-%m-%d").to_string();
        let day = day_view(&db, &student, Some(&date)).await.unwrap();
        assert_eq!(day.lessons.len(), 1);
        assert_eq!(day.recurring.len(), 1);

        let toggled = toggle_recurring(&db, &student, recurring.id).await.unwrap();
        assert!(!toggled.is_active);
        let day = day_view(&db, &student, Some(&date)).await.unwrap();
        assert!(day.recurring.is_empty());
        assert_eq!(manage_view(&db, &student).await.unwrap().recurring.len(), 1);

        assert!(matches!(
            day_view(&db, &student, Some("tomorrow")).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            toggle_recurring(&db, &teacher, recurring.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn recurring_day_must_be_a_weekday_index() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;

        let result = create_recurring(
            &db,
            &student,
            RecurringLessonInput {
                title: "Physics".to_string(),
                description: None,
                day_of_week: 7,
                start_time: "09:30".to_string(),
                duration_minutes: 45,
                teacher_id: teacher.id,
            },
        )
        .await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }
}
