use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tempfile::TempDir;

use crate::entities::user;
use crate::repositories::{NewUser, NotificationSettingsRepository, UserRepository};

/// Fresh SQLite database with every migration applied. Keep the returned
/// `TempDir` alive for as long as the connection is used.
pub async fn setup_test_db() -> (DatabaseConnection, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

    let db = Database::connect(&url).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    (db, dir)
}

/// Inserts a user together with the default notification settings.
pub async fn create_user(db: &DatabaseConnection, username: &str, is_teacher: bool) -> user::Model {
    let user = UserRepository::new(db)
        .create(NewUser {
            email: format!("{}@example.com", username),
            username: username.to_string(),
            full_name: None,
            hashed_password: "not-a-real-hash".to_string(),
            is_teacher,
        })
        .await
        .expect("insert user");

    NotificationSettingsRepository::new(db)
        .create_default(user.id)
        .await
        .expect("insert settings");

    user
}
