use crate::entities::{homework, sea_orm_active_enums::HomeworkStatus};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, sea_query::Expr,
};

pub struct HomeworkRepository<'a> {
    db: &'a DatabaseConnection,
}

pub struct NewHomework {
    pub student_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
}

/// Values written by a successful submission.
pub struct Submission {
    pub submission_path: Option<String>,
    pub comment: Option<String>,
    pub submitted_at: NaiveDateTime,
}

impl<'a> HomeworkRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_homework: NewHomework) -> Result<homework::Model, DbErr> {
        let homework = homework::ActiveModel {
            student_id: Set(new_homework.student_id),
            teacher_id: Set(new_homework.teacher_id),
            title: Set(new_homework.title),
            description: Set(new_homework.description),
            due_date: Set(new_homework.due_date),
            status: Set(HomeworkStatus::Assigned),
            grade: Set(None),
            feedback: Set(None),
            attachment_path: Set(None),
            submission_path: Set(None),
            submission_comment: Set(None),
            created_at: Set(Utc::now().naive_utc()),
            submitted_at: Set(None),
            ..Default::default()
        };

        homework.insert(self.db).await
    }

    pub async fn find_for_student(
        &self,
        homework_id: i32,
        student_id: i32,
    ) -> Result<Option<homework::Model>, DbErr> {
        homework::Entity::find_by_id(homework_id)
            .filter(homework::Column::StudentId.eq(student_id))
            .one(self.db)
            .await
    }

    pub async fn find_for_teacher(
        &self,
        homework_id: i32,
        teacher_id: i32,
    ) -> Result<Option<homework::Model>, DbErr> {
        homework::Entity::find_by_id(homework_id)
            .filter(homework::Column::TeacherId.eq(teacher_id))
            .one(self.db)
            .await
    }

    pub async fn find_for_participant(
        &self,
        homework_id: i32,
        user_id: i32,
    ) -> Result<Option<homework::Model>, DbErr> {
        homework::Entity::find_by_id(homework_id)
            .filter(
                Condition::any()
                    .add(homework::Column::StudentId.eq(user_id))
                    .add(homework::Column::TeacherId.eq(user_id)),
            )
            .one(self.db)
            .await
    }

    pub async fn list_for_student(&self, student_id: i32) -> Result<Vec<homework::Model>, DbErr> {
        homework::Entity::find()
            .filter(homework::Column::StudentId.eq(student_id))
            .order_by_asc(homework::Column::DueDate)
            .all(self.db)
            .await
    }

    /// Most recent homework by due date, as student or as teacher.
    pub async fn list_recent(
        &self,
        user_id: i32,
        as_teacher: bool,
        limit: u64,
    ) -> Result<Vec<homework::Model>, DbErr> {
        let owner = if as_teacher {
            homework::Column::TeacherId
        } else {
            homework::Column::StudentId
        };

        homework::Entity::find()
            .filter(owner.eq(user_id))
            .order_by_desc(homework::Column::DueDate)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Open homework due in `(now, until]`.
    pub async fn list_upcoming(
        &self,
        student_id: i32,
        now: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<homework::Model>, DbErr> {
        homework::Entity::find()
            .filter(homework::Column::StudentId.eq(student_id))
            .filter(homework::Column::DueDate.gt(now))
            .filter(homework::Column::DueDate.lte(until))
            .filter(homework::Column::Status.is_in(HomeworkStatus::OPEN))
            .order_by_asc(homework::Column::DueDate)
            .all(self.db)
            .await
    }

    /// Open homework whose due date is already behind `now`.
    pub async fn list_overdue_open(
        &self,
        student_id: i32,
        now: NaiveDateTime,
    ) -> Result<Vec<homework::Model>, DbErr> {
        homework::Entity::find()
            .filter(homework::Column::StudentId.eq(student_id))
            .filter(homework::Column::DueDate.lt(now))
            .filter(homework::Column::Status.is_in(HomeworkStatus::OPEN))
            .order_by_asc(homework::Column::DueDate)
            .all(self.db)
            .await
    }

    /// Moves the given rows to `late`. Rows that left the open states in the
    /// meantime are left alone, so concurrent sweeps converge on the same state.
    pub async fn mark_late(&self, homework_ids: Vec<i32>) -> Result<u64, DbErr> {
        if homework_ids.is_empty() {
            return Ok(0);
        }

        let result = homework::Entity::update_many()
            .col_expr(homework::Column::Status, Expr::value(HomeworkStatus::Late))
            .filter(homework::Column::Id.is_in(homework_ids))
            .filter(homework::Column::Status.is_in(HomeworkStatus::OPEN))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn list_late(&self, student_id: i32) -> Result<Vec<homework::Model>, DbErr> {
        homework::Entity::find()
            .filter(homework::Column::StudentId.eq(student_id))
            .filter(homework::Column::Status.eq(HomeworkStatus::Late))
            .order_by_asc(homework::Column::DueDate)
            .all(self.db)
            .await
    }

    pub async fn update_status(
        &self,
        homework: homework::Model,
        status: HomeworkStatus,
    ) -> Result<homework::Model, DbErr> {
        let mut active_model: homework::ActiveModel = homework.into();
        active_model.status = Set(status);
        active_model.update(self.db).await
    }

    /// Records the submission only while the row is still submittable.
    /// Returns the number of rows changed; `0` means another submission won.
    pub async fn submit_if_open_with<C: ConnectionTrait>(
        conn: &C,
        homework_id: i32,
        submission: Submission,
    ) -> Result<u64, DbErr> {
        let mut update = homework::Entity::update_many()
            .col_expr(homework::Column::Status, Expr::value(HomeworkStatus::Submitted))
            .col_expr(homework::Column::SubmissionComment, Expr::value(submission.comment))
            .col_expr(homework::Column::SubmittedAt, Expr::value(submission.submitted_at));
        if let Some(path) = submission.submission_path {
            update = update.col_expr(homework::Column::SubmissionPath, Expr::value(path));
        }

        let result = update
            .filter(homework::Column::Id.eq(homework_id))
            .filter(homework::Column::Status.is_in(HomeworkStatus::SUBMITTABLE))
            .exec(conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn set_attachment(
        &self,
        homework: homework::Model,
        attachment_path: String,
    ) -> Result<homework::Model, DbErr> {
        let mut active_model: homework::ActiveModel = homework.into();
        active_model.attachment_path = Set(Some(attachment_path));
        active_model.update(self.db).await
    }
}
