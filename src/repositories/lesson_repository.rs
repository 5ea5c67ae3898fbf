use crate::entities::{lesson, recurring_lesson, sea_orm_active_enums::LessonStatus};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct LessonRepository<'a> {
    db: &'a DatabaseConnection,
}

pub struct NewLesson {
    pub student_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

pub struct NewRecurringLesson {
    pub student_id: i32,
    pub teacher_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub day_of_week: i16,
    pub start_time: String,
    pub duration_minutes: i32,
}

impl<'a> LessonRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// New lessons always start out `planned`.
    pub async fn create(&self, new_lesson: NewLesson) -> Result<lesson::Model, DbErr> {
        let lesson = lesson::ActiveModel {
            student_id: Set(new_lesson.student_id),
            teacher_id: Set(new_lesson.teacher_id),
            title: Set(new_lesson.title),
            description: Set(new_lesson.description),
            start_time: Set(new_lesson.start_time),
            end_time: Set(new_lesson.end_time),
            status: Set(LessonStatus::Planned),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        lesson.insert(self.db).await
    }

    /// Lesson visible to `user_id` as either student or teacher.
    pub async fn find_for_participant(
        &self,
        lesson_id: i32,
        user_id: i32,
    ) -> Result<Option<lesson::Model>, DbErr> {
        lesson::Entity::find_by_id(lesson_id)
            .filter(
                Condition::any()
                    .add(lesson::Column::StudentId.eq(user_id))
                    .add(lesson::Column::TeacherId.eq(user_id)),
            )
            .one(self.db)
            .await
    }

    pub async fn list_for_student_between(
        &self,
        student_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<lesson::Model>, DbErr> {
        lesson::Entity::find()
            .filter(lesson::Column::StudentId.eq(student_id))
            .filter(lesson::Column::StartTime.gte(from))
            .filter(lesson::Column::StartTime.lt(to))
            .order_by_asc(lesson::Column::StartTime)
            .all(self.db)
            .await
    }

    /// Lessons starting after `now`, as student or as teacher.
    pub async fn list_future(
        &self,
        user_id: i32,
        as_teacher: bool,
        now: NaiveDateTime,
        limit: Option<u64>,
    ) -> Result<Vec<lesson::Model>, DbErr> {
        let owner = if as_teacher {
            lesson::Column::TeacherId
        } else {
            lesson::Column::StudentId
        };

        lesson::Entity::find()
            .filter(owner.eq(user_id))
            .filter(lesson::Column::StartTime.gt(now))
            .order_by_asc(lesson::Column::StartTime)
            .limit(limit)
            .all(self.db)
            .await
    }

    /// Planned lessons starting in `(now, until]`.
    pub async fn list_upcoming_planned(
        &self,
        student_id: i32,
        now: NaiveDateTime,
        until: NaiveDateTime,
    ) -> Result<Vec<lesson::Model>, DbErr> {
        lesson::Entity::find()
            .filter(lesson::Column::StudentId.eq(student_id))
            .filter(lesson::Column::StartTime.gt(now))
            .filter(lesson::Column::StartTime.lte(until))
            .filter(lesson::Column::Status.eq(LessonStatus::Planned))
            .order_by_asc(lesson::Column::StartTime)
            .all(self.db)
            .await
    }

    pub async fn update_status(
        &self,
        lesson: lesson::Model,
        status: LessonStatus,
    ) -> Result<lesson::Model, DbErr> {
        let mut active_model: lesson::ActiveModel = lesson.into();
        active_model.status = Set(status);
        active_model.update(self.db).await
    }

    pub async fn create_recurring(
        &self,
        new_recurring: NewRecurringLesson,
    ) -> Result<recurring_lesson::Model, DbErr> {
        let recurring = recurring_lesson::ActiveModel {
            student_id: Set(new_recurring.student_id),
            teacher_id: Set(new_recurring.teacher_id),
            title: Set(new_recurring.title),
            description: Set(new_recurring.description),
            day_of_week: Set(new_recurring.day_of_week),
            start_time: Set(new_recurring.start_time),
            duration_minutes: Set(new_recurring.duration_minutes),
            is_active: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        recurring.insert(self.db).await
    }

    pub async fn list_recurring_for_student(
        &self,
        student_id: i32,
        active_only: bool,
    ) -> Result<Vec<recurring_lesson::Model>, DbErr> {
        let mut query = recurring_lesson::Entity::find()
            .filter(recurring_lesson::Column::StudentId.eq(student_id));

        if active_only {
            query = query.filter(recurring_lesson::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(recurring_lesson::Column::DayOfWeek)
            .order_by_asc(recurring_lesson::Column::StartTime)
            .all(self.db)
            .await
    }

    pub async fn find_recurring_for_student(
        &self,
        recurring_id: i32,
        student_id: i32,
    ) -> Result<Option<recurring_lesson::Model>, DbErr> {
        recurring_lesson::Entity::find_by_id(recurring_id)
            .filter(recurring_lesson::Column::StudentId.eq(student_id))
            .one(self.db)
            .await
    }

    pub async fn set_recurring_active(
        &self,
        recurring: recurring_lesson::Model,
        is_active: bool,
    ) -> Result<recurring_lesson::Model, DbErr> {
        let mut active_model: recurring_lesson::ActiveModel = recurring.into();
        active_model.is_active = Set(is_active);
        active_model.update(self.db).await
    }
}
