use std::net::SocketAddr;

use anyhow::Context;
use tutor_platform::static_service::{init_database_connection, init_knowledge_base};
use tutor_platform::utils::upload::homework_files_dir;
use tutor_platform::{app, config::APP_CONFIG, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    tracing::info!(env = %APP_CONFIG.app_env, "Starting application...");

    let homework_dir = homework_files_dir(&APP_CONFIG.upload_dir);
    tokio::fs::create_dir_all(&homework_dir)
        .await
        .with_context(|| format!("Failed to create {}", homework_dir.display()))?;
    tokio::fs::create_dir_all(&APP_CONFIG.chat_history_dir)
        .await
        .with_context(|| format!("Failed to create {}", APP_CONFIG.chat_history_dir))?;

    init_database_connection().await?;
    init_knowledge_base()?;

    let app = app::create_app().await?;

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("Failed to bind {}", http_address))?;

    tracing::info!("HTTP server listening on {}", &http_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("HTTP server stopped unexpectedly")?;

    Ok(())
}
