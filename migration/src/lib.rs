pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_table_users;
mod m20261001_000002_create_table_lessons;
mod m20261001_000003_create_table_homework;
mod m20261001_000004_create_table_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_table_users::Migration),
            Box::new(m20261001_000002_create_table_lessons::Migration),
            Box::new(m20261001_000003_create_table_homework::Migration),
            Box::new(m20261001_000004_create_table_notifications::Migration),
        ]
    }
}
