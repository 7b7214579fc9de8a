//! Logging Infrastructure
//!
//! Console output is always enabled. With a log directory, application logs
//! also go to a daily rotating file (`table-server.YYYY-MM-DD`), and the
//! `table_events` target gets its own file so the lifecycle history can be
//! read without request noise.

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, filter::filter_fn, fmt, prelude::*};

const EVENTS_TARGET: &str = "table_events";

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug"), overridden by `RUST_LOG`
/// * `json_format` - JSON lines for production, pretty output otherwise
/// * `log_dir` - Optional directory for rotating file logs
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layers = match log_dir {
        Some(dir) => {
            let log_dir = Path::new(dir);
            fs::create_dir_all(log_dir)?;

            let app_log = RollingFileAppender::new(Rotation::DAILY, log_dir, "table-server");
            let app_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(filter_fn(|meta| meta.target() != EVENTS_TARGET));

            // 桌台状态变化单独存档
            let events_log = RollingFileAppender::new(Rotation::DAILY, log_dir, "table-events");
            let events_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(events_log))
                .with_filter(filter_fn(|meta| meta.target() == EVENTS_TARGET));

            Some(app_layer.and_then(events_layer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layers)
        .try_init()?;

    Ok(())
}
