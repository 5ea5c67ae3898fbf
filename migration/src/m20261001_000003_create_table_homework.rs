use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Homework::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Homework::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Homework::StudentId).integer().not_null())
                    .col(ColumnDef::new(Homework::TeacherId).integer().not_null())
                    .col(ColumnDef::new(Homework::Title).string().not_null())
                    .col(ColumnDef::new(Homework::Description).text().null())
                    .col(ColumnDef::new(Homework::DueDate).timestamp().not_null())
                    .col(
                        ColumnDef::new(Homework::Status)
                            .string_len(20)
                            .not_null()
                            .default("assigned"),
                    )
                    .col(ColumnDef::new(Homework::Grade).integer().null())
                    .col(ColumnDef::new(Homework::Feedback).text().null())
                    .col(ColumnDef::new(Homework::AttachmentPath).string().null())
                    .col(ColumnDef::new(Homework::SubmissionPath).string().null())
                    .col(ColumnDef::new(Homework::SubmissionComment).text().null())
                    .col(
                        ColumnDef::new(Homework::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(ColumnDef::new(Homework::SubmittedAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_homework_student")
                            .from_tbl(Homework::Table)
                            .from_col(Homework::StudentId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_homework_teacher")
                            .from_tbl(Homework::Table)
                            .from_col(Homework::TeacherId)
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
                    .name("idx_homework_student_status")
                    .table(Homework::Table)
                    .col(Homework::StudentId)
                    .col(Homework::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_homework_teacher_id")
                    .table(Homework::Table)
                    .col(Homework::TeacherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Homework::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Homework {
    Table,
    Id,
    StudentId,
    TeacherId,
    Title,
    Description,
    DueDate,
    Status,
    Grade,
    Feedback,
    AttachmentPath,
    SubmissionPath,
    SubmissionComment,
    CreatedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
