use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::entities::{homework, sea_orm_active_enums::HomeworkStatus, user};
use crate::error::{ServiceError, ServiceResult};
use crate::lifecycle::{HomeworkAction, HomeworkTransitionError, homework::next_status};
use crate::notifications::NotificationManager;
use crate::repositories::{HomeworkRepository, NewHomework, Submission, UserRepository};
use crate::utils::upload::{
    UploadedFile, attachment_file_name, homework_files_dir, store_file, submission_file_name,
};
use crate::utils::validators::lookahead_end;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HomeworkStats {
    pub total: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub submitted: u64,
    pub reviewed: u64,
    pub late: u64,
}

pub struct HomeworkInput {
    pub student_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
}

pub struct SubmissionInput {
    pub file: Option<UploadedFile>,
    pub comment: Option<String>,
}

fn not_found() -> ServiceError {
    ServiceError::NotFound("Homework not found".to_string())
}

async fn find_for_student(
    db: &DatabaseConnection,
    student: &user::Model,
    homework_id: i32,
) -> ServiceResult<homework::Model> {
    HomeworkRepository::new(db)
        .find_for_student(homework_id, student.id)
        .await?
        .ok_or_else(not_found)
}

impl HomeworkStats {
    fn tally(homework: &[homework::Model]) -> Self {
        homework.iter().fold(
            HomeworkStats {
                total: homework.len() as u64,
                ..Default::default()
            },
            |mut stats, hw| {
                match hw.status {
                    HomeworkStatus::Assigned => stats.assigned += 1,
                    HomeworkStatus::InProgress => stats.in_progress += 1,
                    HomeworkStatus::Submitted => stats.submitted += 1,
                    HomeworkStatus::Reviewed => stats.reviewed += 1,
                    HomeworkStatus::Late => stats.late += 1,
                }
                stats
            },
        )
    }
}

/// Student's homework ordered by due date, optionally narrowed to one status.
pub async fn list_homework(
    db: &DatabaseConnection,
    student: &user::Model,
    status: Option<&str>,
) -> ServiceResult<(Vec<homework::Model>, HomeworkStats)> {
    let status = status
        .filter(|s| !s.is_empty())
        .map(str::parse::<HomeworkStatus>)
        .transpose()
        .map_err(ServiceError::Validation)?;

    let repo = HomeworkRepository::new(db);
    let all = repo.list_for_student(student.id).await?;
    let stats = HomeworkStats::tally(&all);

    let homework = match status {
        Some(status) => all.into_iter().filter(|hw| hw.status == status).collect(),
        None => all,
    };

    Ok((homework, stats))
}

pub async fn create_homework(
    db: &DatabaseConnection,
    teacher: &user::Model,
    input: HomeworkInput,
) -> ServiceResult<homework::Model> {
    if !teacher.is_teacher {
        return Err(ServiceError::Forbidden(
            "Only teachers can assign homework".to_string(),
        ));
    }

    let title = input.title.trim();
    if title.is_empty() {
        return Err(ServiceError::Validation("Title cannot be empty".to_string()));
    }

    UserRepository::new(db)
        .find_by_id(input.student_id)
        .await?
        .ok_or_else(|| {
            ServiceError::Validation(format!("Student {} does not exist", input.student_id))
        })?;

    let homework = HomeworkRepository::new(db)
        .create(NewHomework {
            student_id: input.student_id,
            teacher_id: teacher.id,
            title: title.to_string(),
            description: input.description,
            due_date: input.due_date,
        })
        .await?;

    tracing::info!(
        homework_id = homework.id,
        student_id = homework.student_id,
        teacher_id = homework.teacher_id,
        "Homework assigned"
    );

    NotificationManager::new(db)
        .homework_assigned(&homework)
        .await?;

    Ok(homework)
}

pub async fn get_homework(
    db: &DatabaseConnection,
    user: &user::Model,
    homework_id: i32,
) -> ServiceResult<homework::Model> {
    HomeworkRepository::new(db)
        .find_for_participant(homework_id, user.id)
        .await?
        .ok_or_else(not_found)
}

pub async fn start_homework(
    db: &DatabaseConnection,
    student: &user::Model,
    homework_id: i32,
) -> ServiceResult<homework::Model> {
    let homework = find_for_student(db, student, homework_id).await?;

    match next_status(homework.status, HomeworkAction::Start)? {
        Some(next) => Ok(HomeworkRepository::new(db)
            .update_status(homework, next)
            .await?),
        None => Ok(homework),
    }
}

/// Hands the work in, stores the optional file and tells the teacher.
pub async fn submit_homework(
    db: &DatabaseConnection,
    student: &user::Model,
    homework_id: i32,
    input: SubmissionInput,
    upload_dir: &str,
) -> ServiceResult<homework::Model> {
    let homework = find_for_student(db, student, homework_id).await?;
    submit_loaded(db, student, homework, input, upload_dir, Utc::now().naive_utc()).await
}

/// Submits against a row read earlier. The write re-checks the status, so a
/// submission that landed in between wins and this one gets `Conflict`.
async fn submit_loaded(
    db: &DatabaseConnection,
    student: &user::Model,
    homework: homework::Model,
    input: SubmissionInput,
    upload_dir: &str,
    now: NaiveDateTime,
) -> ServiceResult<homework::Model> {
    next_status(
        homework.status,
        HomeworkAction::Submit {
            due_date: homework.due_date,
            now,
        },
    )?;

    let files_dir = homework_files_dir(upload_dir);
    let stored_name = input
        .file
        .as_ref()
        .map(|file| submission_file_name(homework.id, student.id, now, &file.file_name));
    let submission_path = stored_name
        .as_ref()
        .map(|name| files_dir.join(name).to_string_lossy().into_owned());

    let txn = db.begin().await?;
    let updated = HomeworkRepository::submit_if_open_with(
        &txn,
        homework.id,
        Submission {
            submission_path,
            comment: input.comment,
            submitted_at: now,
        },
    )
    .await?;
    if updated == 0 {
        txn.rollback().await?;
        return Err(HomeworkTransitionError::AlreadySubmitted.into());
    }

    // Only the submission that claimed the row writes its file
    let stored = match (input.file, stored_name) {
        (Some(file), Some(name)) => store_file(&files_dir, &name, &file.data).await.map(|_| ()),
        _ => Ok(()),
    };
    if let Err(err) = stored {
        txn.rollback().await?;
        return Err(err.into());
    }
    txn.commit().await?;

    let homework = find_for_student(db, student, homework.id).await?;

    tracing::info!(
        homework_id = homework.id,
        student_id = student.id,
        has_file = homework.submission_path.is_some(),
        "Homework submitted"
    );

    NotificationManager::new(db)
        .homework_submitted(&student.username, &homework)
        .await?;

    Ok(homework)
}

pub async fn upload_attachment(
    db: &DatabaseConnection,
    teacher: &user::Model,
    homework_id: i32,
    file: UploadedFile,
    upload_dir: &str,
) -> ServiceResult<homework::Model> {
    let repo = HomeworkRepository::new(db);
    let homework = repo
        .find_for_teacher(homework_id, teacher.id)
        .await?
        .ok_or_else(not_found)?;

    let file_name = attachment_file_name(homework.id, Utc::now().naive_utc(), &file.file_name);
    let path = store_file(&homework_files_dir(upload_dir), &file_name, &file.data).await?;

    Ok(repo
        .set_attachment(homework, path.to_string_lossy().into_owned())
        .await?)
}

fn existing_file(path: Option<&str>) -> ServiceResult<PathBuf> {
    let path = path.ok_or_else(|| ServiceError::NotFound("File not found".to_string()))?;
    let path = Path::new(path);
    if !path.is_file() {
        return Err(ServiceError::NotFound("File does not exist".to_string()));
    }
    Ok(path.to_path_buf())
}

/// Teacher's attachment, visible to both participants.
pub async fn attachment_file(
    db: &DatabaseConnection,
    user: &user::Model,
    homework_id: i32,
) -> ServiceResult<PathBuf> {
    let homework = get_homework(db, user, homework_id).await?;
    existing_file(homework.attachment_path.as_deref())
}

pub async fn submission_file(
    db: &DatabaseConnection,
    user: &user::Model,
    homework_id: i32,
) -> ServiceResult<PathBuf> {
    let homework = get_homework(db, user, homework_id).await?;
    existing_file(homework.submission_path.as_deref())
}

/// Open homework due within the next `days` days.
pub async fn upcoming_homework(
    db: &DatabaseConnection,
    student: &user::Model,
    days: i64,
) -> ServiceResult<Vec<homework::Model>> {
    let now = Utc::now().naive_utc();
    let until = lookahead_end(now, days).map_err(ServiceError::Validation)?;

    Ok(HomeworkRepository::new(db)
        .list_upcoming(student.id, now, until)
        .await?)
}

/// Moves overdue open homework to `late`, then lists every late row.
pub async fn late_homework(
    db: &DatabaseConnection,
    student: &user::Model,
) -> ServiceResult<Vec<homework::Model>> {
    late_homework_at(db, student, Utc::now().naive_utc()).await
}

async fn late_homework_at(
    db: &DatabaseConnection,
    student: &user::Model,
    now: NaiveDateTime,
) -> ServiceResult<Vec<homework::Model>> {
    let repo = HomeworkRepository::new(db);

    let mut overdue = Vec::new();
    for homework in repo.list_overdue_open(student.id, now).await? {
        let action = HomeworkAction::MarkLate {
            due_date: homework.due_date,
            now,
        };
        if next_status(homework.status, action)? == Some(HomeworkStatus::Late) {
            overdue.push(homework.id);
        }
    }

    let updated = repo.mark_late(overdue).await?;
    if updated > 0 {
        tracing::info!(student_id = student.id, updated, "Marked overdue homework as late");
    }

    Ok(repo.list_late(student.id).await?)
}

/// Grading has no workflow yet; always answers with the capability gap.
pub async fn review_homework(
    db: &DatabaseConnection,
    teacher: &user::Model,
    homework_id: i32,
) -> ServiceResult<homework::Model> {
    let homework = HomeworkRepository::new(db)
        .find_for_teacher(homework_id, teacher.id)
        .await?
        .ok_or_else(not_found)?;

    next_status(homework.status, HomeworkAction::Review)?;
    Ok(homework)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_LOOKAHEAD_DAYS;
    use crate::entities::notification;
    use crate::test_utils::{create_user, setup_test_db};
    use chrono::Duration;
    use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

    async fn assign(
        db: &DatabaseConnection,
        student: &user::Model,
        teacher: &user::Model,
        due_in: Duration,
    ) -> homework::Model {
        HomeworkRepository::new(db)
            .create(NewHomework {
                student_id: student.id,
                teacher_id: teacher.id,
                title: "Essay".to_string(),
                description: None,
                due_date: Utc::now().naive_utc() + due_in,
            })
            .await
            .unwrap()
    }

    async fn notification_count(db: &DatabaseConnection, user_id: i32) -> u64 {
        notification::Entity::find()
            .filter(notification::Column::UserId.eq(user_id))
            .count(db)
            .await
            .unwrap()
    }

    fn file() -> SubmissionInput {
        SubmissionInput {
            file: Some(UploadedFile {
                file_name: "essay.txt".to_string(),
                data: b"my essay".to_vec(),
            }),
            comment: Some("done".to_string()),
        }
    }

    #[tokio::test]
    async fn submit_stores_file_and_notifies_teacher_once() {
        let (db, dir) = setup_test_db().await;
        let upload_dir = dir.path().join("uploads").to_string_lossy().into_owned();
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let hw = assign(&db, &student, &teacher, Duration::days(2)).await;

        let submitted = submit_homework(&db, &student, hw.id, file(), &upload_dir)
            .await
            .unwrap();

        assert_eq!(submitted.status, HomeworkStatus::Submitted);
        assert!(submitted.submitted_at.is_some());
        assert_eq!(submitted.submission_comment.as_deref(), Some("done"));
        let path = submitted.submission_path.clone().expect("submission path");
        assert!(path.contains(&format!("{}_{}_", hw.id, student.id)));
        assert_eq!(std::fs::read(&path).unwrap(), b"my essay");
        assert_eq!(notification_count(&db, teacher.id).await, 1);

        let resolved = submission_file(&db, &teacher, hw.id).await.unwrap();
        assert_eq!(resolved, PathBuf::from(path));
    }

    #[tokio::test]
    async fn submit_is_rejected_when_done_or_overdue() {
        let (db, dir) = setup_test_db().await;
        let upload_dir = dir.path().to_string_lossy().into_owned();
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;

        let hw = assign(&db, &student, &teacher, Duration::days(2)).await;
        let no_file = || SubmissionInput {
            file: None,
            comment: None,
        };
        submit_homework(&db, &student, hw.id, no_file(), &upload_dir)
            .await
            .unwrap();
        assert!(matches!(
            submit_homework(&db, &student, hw.id, no_file(), &upload_dir).await,
            Err(ServiceError::Conflict(_))
        ));

        let overdue = assign(&db, &student, &teacher, -Duration::days(1)).await;
        assert!(matches!(
            submit_homework(&db, &student, overdue.id, file(), &upload_dir).await,
            Err(ServiceError::Conflict(_))
        ));
        let unchanged = get_homework(&db, &student, overdue.id).await.unwrap();
        assert_eq!(unchanged.status, HomeworkStatus::Assigned);
        assert!(unchanged.submission_path.is_none());

        // One notification from the single successful submission
        assert_eq!(notification_count(&db, teacher.id).await, 1);
    }

    #[tokio::test]
    async fn stale_submission_loses_and_leaves_no_file() {
        let (db, dir) = setup_test_db().await;
        let upload_dir = dir.path().join("uploads").to_string_lossy().into_owned();
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let stale = assign(&db, &student, &teacher, Duration::days(2)).await;
        let now = Utc::now().naive_utc();

        // Both requests read the row while it was still assigned
        let winner = submit_loaded(&db, &student, stale.clone(), file(), &upload_dir, now)
            .await
            .unwrap();
        let second = SubmissionInput {
            file: Some(UploadedFile {
                file_name: "second.txt".to_string(),
                data: b"second try".to_vec(),
            }),
            comment: Some("again".to_string()),
        };
        assert!(matches!(
            submit_loaded(&db, &student, stale, second, &upload_dir, now).await,
            Err(ServiceError::Conflict(_))
        ));

        let stored = get_homework(&db, &student, winner.id).await.unwrap();
        assert_eq!(stored.submission_comment.as_deref(), Some("done"));
        assert_eq!(stored.submission_path, winner.submission_path);
        assert_eq!(notification_count(&db, teacher.id).await, 1);

        let files: Vec<_> = std::fs::read_dir(homework_files_dir(&upload_dir))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("essay.txt"));
    }

    #[tokio::test]
    async fn upcoming_window_outside_range_is_rejected() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        assign(&db, &student, &teacher, Duration::days(2)).await;

        for days in [-1, MAX_LOOKAHEAD_DAYS + 1, 1_000_000_000, i64::MAX] {
            assert!(
                matches!(
                    upcoming_homework(&db, &student, days).await,
                    Err(ServiceError::Validation(_))
                ),
                "{days}"
            );
        }
        assert_eq!(
            upcoming_homework(&db, &student, MAX_LOOKAHEAD_DAYS)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn only_the_owning_student_can_submit() {
        let (db, dir) = setup_test_db().await;
        let upload_dir = dir.path().to_string_lossy().into_owned();
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let other = create_user(&db, "other", false).await;
        let hw = assign(&db, &student, &teacher, Duration::days(2)).await;

        assert!(matches!(
            submit_homework(&db, &other, hw.id, file(), &upload_dir).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn late_sweep_marks_once_and_keeps_listing() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let overdue = assign(&db, &student, &teacher, -Duration::days(1)).await;
        let open = assign(&db, &student, &teacher, Duration::days(1)).await;

        let first = late_homework(&db, &student).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, overdue.id);
        assert_eq!(first[0].status, HomeworkStatus::Late);

        let second = late_homework(&db, &student).await.unwrap();
        assert_eq!(second, first);

        let untouched = get_homework(&db, &student, open.id).await.unwrap();
        assert_eq!(untouched.status, HomeworkStatus::Assigned);
    }

    #[tokio::test]
    async fn late_sweep_skips_submitted_work() {
        let (db, dir) = setup_test_db().await;
        let upload_dir = dir.path().to_string_lossy().into_owned();
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let hw = assign(&db, &student, &teacher, Duration::hours(1)).await;
        submit_homework(
            &db,
            &student,
            hw.id,
            SubmissionInput {
                file: None,
                comment: None,
            },
            &upload_dir,
        )
        .await
        .unwrap();

        let later = Utc::now().naive_utc() + Duration::days(1);
        assert!(late_homework_at(&db, &student, later).await.unwrap().is_empty());
        let hw = get_homework(&db, &student, hw.id).await.unwrap();
        assert_eq!(hw.status, HomeworkStatus::Submitted);
    }

    #[tokio::test]
    async fn start_only_moves_assigned_work() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let hw = assign(&db, &student, &teacher, Duration::days(2)).await;

        let started = start_homework(&db, &student, hw.id).await.unwrap();
        assert_eq!(started.status, HomeworkStatus::InProgress);
        let again = start_homework(&db, &student, hw.id).await.unwrap();
        assert_eq!(again.status, HomeworkStatus::InProgress);
    }

    #[tokio::test]
    async fn teachers_assign_and_students_are_notified() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let due_date = Utc::now().naive_utc() + Duration::days(3);
        let input = |student_id| HomeworkInput {
            student_id,
            title: "Worksheet".to_string(),
            description: Some("Pages 10-12".to_string()),
            due_date,
        };

        assert!(matches!(
            create_homework(&db, &student, input(student.id)).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            create_homework(&db, &teacher, input(student.id + 100)).await,
            Err(ServiceError::Validation(_))
        ));

        let hw = create_homework(&db, &teacher, input(student.id)).await.unwrap();
        assert_eq!(hw.status, HomeworkStatus::Assigned);
        assert_eq!(hw.teacher_id, teacher.id);
        assert_eq!(notification_count(&db, student.id).await, 1);

        let (list, stats) = list_homework(&db, &student, None).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.assigned, 1);

        let (filtered, _) = list_homework(&db, &student, Some("submitted")).await.unwrap();
        assert!(filtered.is_empty());
        assert!(matches!(
            list_homework(&db, &student, Some("graded")).await,
            Err(ServiceError::Validation(_))
        ));

        let upcoming = upcoming_homework(&db, &student, 7).await.unwrap();
        assert_eq!(upcoming.len(), 1);
    }

    #[tokio::test]
    async fn attachments_round_trip_through_storage() {
        let (db, dir) = setup_test_db().await;
        let upload_dir = dir.path().to_string_lossy().into_owned();
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let hw = assign(&db, &student, &teacher, Duration::days(2)).await;

        assert!(matches!(
            attachment_file(&db, &student, hw.id).await,
            Err(ServiceError::NotFound(_))
        ));

        let attachment = UploadedFile {
            file_name: "task.pdf".to_string(),
            data: b"%PDF".to_vec(),
        };
        assert!(matches!(
            upload_attachment(&db, &student, hw.id, attachment.clone(), &upload_dir).await,
            Err(ServiceError::NotFound(_))
        ));
        let updated = upload_attachment(&db, &teacher, hw.id, attachment, &upload_dir)
            .await
            .unwrap();
        assert!(updated.attachment_path.is_some());

        let path = attachment_file(&db, &student, hw.id).await.unwrap();
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(&format!("attachment_{}_", hw.id))
        );
    }

    #[tokio::test]
    async fn review_is_an_explicit_gap() {
        let (db, _dir) = setup_test_db().await;
        let teacher = create_user(&db, "teacher", true).await;
        let student = create_user(&db, "student", false).await;
        let hw = assign(&db, &student, &teacher, Duration::days(2)).await;

        assert!(matches!(
            review_homework(&db, &teacher, hw.id).await,
            Err(ServiceError::NotImplemented(_))
        ));
    }
}
