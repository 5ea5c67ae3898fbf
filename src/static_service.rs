use std::time::Duration;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use once_cell::sync::{Lazy, OnceCell};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::APP_CONFIG;
use crate::knowledge_base::KnowledgeBase;
use crate::services::assistant::ChatHistoryStore;

pub static DATABASE_CONNECTION: OnceCell<DatabaseConnection> = OnceCell::new();
pub static KNOWLEDGE_BASE: OnceCell<KnowledgeBase> = OnceCell::new();
pub static CHAT_HISTORY: Lazy<ChatHistoryStore> =
    Lazy::new(|| ChatHistoryStore::new(&APP_CONFIG.chat_history_dir));

/// Connects to the configured database, applies pending migrations and
/// stores the connection for the rest of the process.
pub async fn init_database_connection() -> anyhow::Result<&'static DatabaseConnection> {
    let mut opt = ConnectOptions::new(APP_CONFIG.database_url.clone());
    opt.max_connections(10)
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;

    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database ready");

    Ok(DATABASE_CONNECTION.get_or_init(|| db))
}

pub fn get_database_connection() -> &'static DatabaseConnection {
    DATABASE_CONNECTION
        .get()
        .expect("DATABASE_CONNECTION not set")
}

pub fn init_knowledge_base() -> anyhow::Result<&'static KnowledgeBase> {
    let knowledge_base = match &APP_CONFIG.knowledge_base_path {
        Some(path) => KnowledgeBase::from_file(path)
            .with_context(|| format!("Failed to load knowledge base from {}", path))?,
        None => KnowledgeBase::bundled().context("Failed to parse bundled knowledge base")?,
    };

    tracing::info!(
        subjects = knowledge_base.subjects().count(),
        "Knowledge base loaded"
    );

    Ok(KNOWLEDGE_BASE.get_or_init(|| knowledge_base))
}

pub fn get_knowledge_base() -> &'static KnowledgeBase {
    KNOWLEDGE_BASE.get().expect("KNOWLEDGE_BASE not set")
}

pub fn get_chat_history() -> &'static ChatHistoryStore {
    &CHAT_HISTORY
}
