//! 工具模块
//!
//! - [`logger`] - tracing 日志初始化

pub mod logger;

pub use logger::init_logger_with_file;

/// 加载 `.env` 并按 `LOG_LEVEL` / `LOG_DIR` / `ENVIRONMENT` 初始化日志
///
/// 必须在读取 [`Config`](crate::Config) 之前调用。
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 可选
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let json = std::env::var("ENVIRONMENT").is_ok_and(|env| env == "production");
    let log_dir = std::env::var("LOG_DIR").ok().filter(|dir| !dir.trim().is_empty());

    init_logger_with_file(&level, json, log_dir.as_deref())
}
