use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One-off lessons
        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lessons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lessons::StudentId).integer().not_null())
                    .col(ColumnDef::new(Lessons::TeacherId).integer().not_null())
                    .col(ColumnDef::new(Lessons::Title).string().not_null())
                    .col(ColumnDef::new(Lessons::Description).text().null())
                    .col(ColumnDef::new(Lessons::StartTime).timestamp().not_null())
                    .col(ColumnDef::new(Lessons::EndTime).timestamp().not_null())
                    .col(
                        ColumnDef::new(Lessons::Status)
                            .string_len(20)
                            .not_null()
                            .default("planned"),
                    )
                    .col(
                        ColumnDef::new(Lessons::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lessons_student")
                            .from_tbl(Lessons::Table)
                            .from_col(Lessons::StudentId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lessons_teacher")
                            .from_tbl(Lessons::Table)
                            .from_col(Lessons::TeacherId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lessons_student_start")
                    .table(Lessons::Table)
                    .col(Lessons::StudentId)
                    .col(Lessons::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lessons_teacher_id")
                    .table(Lessons::Table)
                    .col(Lessons::TeacherId)
                    .to_owned(),
            )
            .await?;

        // Weekly recurring slots
        manager
            .create_table(
                Table::create()
                    .table(RecurringLessons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecurringLessons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecurringLessons::StudentId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringLessons::TeacherId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringLessons::Title).string().not_null())
                    .col(ColumnDef::new(RecurringLessons::Description).text().null())
                    .col(
                        ColumnDef::new(RecurringLessons::DayOfWeek)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringLessons::StartTime)
                            .string_len(5)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringLessons::DurationMinutes)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(
                        ColumnDef::new(RecurringLessons::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RecurringLessons::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_lessons_student")
                            .from_tbl(RecurringLessons::Table)
                            .from_col(RecurringLessons::StudentId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_lessons_teacher")
                            .from_tbl(RecurringLessons::Table)
                            .from_col(RecurringLessons::TeacherId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recurring_lessons_student_id")
                    .table(RecurringLessons::Table)
                    .col(RecurringLessons::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecurringLessons::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Lessons {
    Table,
    Id,
    StudentId,
    TeacherId,
    Title,
    Description,
    StartTime,
    EndTime,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RecurringLessons {
    Table,
    Id,
    StudentId,
    TeacherId,
    Title,
    Description,
    DayOfWeek,
    StartTime,
    DurationMinutes,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
