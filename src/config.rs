use clap::Parser;
use once_cell::sync::Lazy;

pub const JWT_ALGORITHM: jsonwebtoken::Algorithm = jsonwebtoken::Algorithm::HS256;

pub const CHAT_HISTORY_LIMIT: usize = 100;
pub const DASHBOARD_ITEMS: u64 = 5;
pub const NOTIFICATION_PAGE_LIMIT: u64 = 100;
/// Widest `days` window accepted by the upcoming lesson and homework views.
pub const MAX_LOOKAHEAD_DAYS: i64 = 366;

pub static APP_CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8000)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env, default_value = "sqlite://tutor_platform.db?mode=rwc")]
    pub database_url: String,

    #[clap(long, env, default_value = "your-secret-key-change-in-production")]
    pub secret_key: String,

    #[clap(long, env, default_value_t = 30)]
    pub token_expire_minutes: i64,

    #[clap(long, env, default_value = "uploads")]
    pub upload_dir: String,

    #[clap(long, env, default_value = "uploads/chat_histories")]
    pub chat_history_dir: String,

    /// Request body cap in bytes, applies to file uploads
    #[clap(long, env, default_value_t = 10 * 1024 * 1024)]
    pub max_upload_size: usize,

    /// JSON file replacing the bundled knowledge base
    #[clap(long, env)]
    pub knowledge_base_path: Option<String>,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,
}
