use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).integer().not_null())
                    .col(ColumnDef::new(Notifications::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string_len(30)
                            .not_null()
                            .default("system_message"),
                    )
                    .col(
                        ColumnDef::new(Notifications::Status)
                            .string_len(20)
                            .not_null()
                            .default("unread"),
                    )
                    .col(
                        ColumnDef::new(Notifications::RelatedEntityType)
                            .string_len(50)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::RelatedEntityId)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::Priority)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Notifications::IsActionable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notifications::ActionUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(ColumnDef::new(Notifications::ReadAt).timestamp().null())
                    .col(ColumnDef::new(Notifications::ExpiresAt).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notifications_user")
                            .from_tbl(Notifications::Table)
                            .from_col(Notifications::UserId)
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
                    .name("idx_notifications_user_status")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::Status)
                    .to_owned(),
            )
            .await?;

        // One settings row per user, enforced by the unique key on user_id
        manager
            .create_table(
                Table::create()
                    .table(NotificationSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::UserId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(bool_col(NotificationSettings::EmailEnabled, true))
                    .col(bool_col(NotificationSettings::EmailHomework, true))
                    .col(bool_col(NotificationSettings::EmailLessons, true))
                    .col(bool_col(NotificationSettings::EmailSystem, true))
                    .col(bool_col(NotificationSettings::EmailPromotions, false))
                    .col(bool_col(NotificationSettings::PushEnabled, true))
                    .col(bool_col(NotificationSettings::PushHomework, true))
                    .col(bool_col(NotificationSettings::PushLessons, true))
                    .col(bool_col(NotificationSettings::PushSystem, true))
                    .col(bool_col(NotificationSettings::SmsEnabled, false))
                    .col(bool_col(NotificationSettings::SmsLessonsReminder, false))
                    .col(bool_col(NotificationSettings::SmsImportant, true))
                    .col(
                        ColumnDef::new(NotificationSettings::LessonReminderHours)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::HomeworkReminderDays)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::QuietStart)
                            .string_len(5)
                            .not_null()
                            .default("22:00"),
                    )
                    .col(
                        ColumnDef::new(NotificationSettings::QuietEnd)
                            .string_len(5)
                            .not_null()
                            .default("08:00"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notification_settings_user")
                            .from_tbl(NotificationSettings::Table)
                            .from_col(NotificationSettings::UserId)
                            .to_tbl(Users::Table)
                            .to_col(Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NotificationSettings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;

        Ok(())
    }
}

fn bool_col(column: NotificationSettings, default: bool) -> ColumnDef {
    ColumnDef::new(column)
        .boolean()
        .not_null()
        .default(default)
        .to_owned()
}

#[derive(DeriveIden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    Message,
    NotificationType,
    Status,
    RelatedEntityType,
    RelatedEntityId,
    Priority,
    IsActionable,
    ActionUrl,
    CreatedAt,
    ReadAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum NotificationSettings {
    Table,
    Id,
    UserId,
    EmailEnabled,
    EmailHomework,
    EmailLessons,
    EmailSystem,
    EmailPromotions,
    PushEnabled,
    PushHomework,
    PushLessons,
    PushSystem,
    SmsEnabled,
    SmsLessonsReminder,
    SmsImportant,
    LessonReminderHours,
    HomeworkReminderDays,
    QuietStart,
    QuietEnd,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
