use std::str::FromStr;
use std::time::Duration;

use crate::core::ServerError;

/// 各时长配置上限 (7 天)
const MAX_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;
use crate::tables::{LifecycleTimings, ManagerOptions, TableLayout};

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，按天滚动 |
/// | TABLE_COUNT | 12 | 桌台数量 |
/// | RESERVATION_WINDOW_SECS | 600 | 预订保留时长(秒) |
/// | DINING_WINDOW_SECS | 1800 | 用餐时长(秒) |
/// | CLEANING_DURATION_SECS | 300 | 清洁时长(秒) |
/// | ENFORCE_WINDOWS | true | 预订/用餐超时是否自动推进状态 |
/// | UPSTREAM_BASE_URL | (无) | 外部订单 API 地址 |
/// | UPSTREAM_STAND_ID | (无) | 同步模式只合并该摊位的桌台 |
/// | UPSTREAM_TIMEOUT_MS | 5000 | 外部请求超时(毫秒) |
/// | UPSTREAM_CLEANING_WINDOW_SECS | 1800 | 外部订单完成后视为待清洁的时长(秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 TABLE_COUNT=20 cargo run
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | production
    pub environment: String,
    /// 默认日志级别 (RUST_LOG 优先)
    pub log_level: String,
    /// 日志文件目录
    pub log_dir: Option<String>,

    // === 桌台 ===
    pub table_count: u32,
    pub reservation_window_secs: u64,
    pub dining_window_secs: u64,
    pub cleaning_duration_secs: u64,
    /// 预订和用餐窗口由服务器强制执行
    pub enforce_windows: bool,

    // === 外部订单 API ===
    pub upstream_base_url: Option<String>,
    pub upstream_stand_id: Option<i64>,
    pub upstream_timeout_ms: u64,
    /// 最近完成的外部订单在此时长内视为待清洁
    pub upstream_cleaning_window_secs: u64,

    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 3000,
            environment: "development".into(),
            log_level: "info".into(),
            log_dir: None,
            table_count: 12,
            reservation_window_secs: 600,
            dining_window_secs: 1800,
            cleaning_duration_secs: 300,
            enforce_windows: true,
            upstream_base_url: None,
            upstream_stand_id: None,
            upstream_timeout_ms: 5000,
            upstream_cleaning_window_secs: 1800,
            shutdown_timeout_ms: 10000,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            http_port: env_parse("HTTP_PORT", defaults.http_port),
            environment: env_string("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: env_string("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: env_string("LOG_DIR"),
            table_count: env_parse("TABLE_COUNT", defaults.table_count),
            reservation_window_secs: env_parse(
                "RESERVATION_WINDOW_SECS",
                defaults.reservation_window_secs,
            ),
            dining_window_secs: env_parse("DINING_WINDOW_SECS", defaults.dining_window_secs),
            cleaning_duration_secs: env_parse(
                "CLEANING_DURATION_SECS",
                defaults.cleaning_duration_secs,
            ),
            enforce_windows: env_parse("ENFORCE_WINDOWS", defaults.enforce_windows),
            upstream_base_url: env_string("UPSTREAM_BASE_URL"),
            upstream_stand_id: env_string("UPSTREAM_STAND_ID").and_then(|v| v.parse().ok()),
            upstream_timeout_ms: env_parse("UPSTREAM_TIMEOUT_MS", defaults.upstream_timeout_ms),
            upstream_cleaning_window_secs: env_parse(
                "UPSTREAM_CLEANING_WINDOW_SECS",
                defaults.upstream_cleaning_window_secs,
            ),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", defaults.shutdown_timeout_ms),
        }
    }

    /// 校验配置，零桌台、零值或超过 7 天的时长视为错误
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.table_count == 0 {
            return Err(ServerError::Config("TABLE_COUNT must be at least 1".into()));
        }
        let durations = [
            ("RESERVATION_WINDOW_SECS", self.reservation_window_secs),
            ("DINING_WINDOW_SECS", self.dining_window_secs),
            ("CLEANING_DURATION_SECS", self.cleaning_duration_secs),
            ("UPSTREAM_TIMEOUT_MS", self.upstream_timeout_ms),
            ("UPSTREAM_CLEANING_WINDOW_SECS", self.upstream_cleaning_window_secs),
        ];
        if let Some((name, _)) = durations.iter().find(|(_, value)| *value == 0) {
            return Err(ServerError::Config(format!("{} must be greater than 0", name)));
        }
        let windows = [
            ("RESERVATION_WINDOW_SECS", self.reservation_window_secs),
            ("DINING_WINDOW_SECS", self.dining_window_secs),
            ("CLEANING_DURATION_SECS", self.cleaning_duration_secs),
            ("UPSTREAM_CLEANING_WINDOW_SECS", self.upstream_cleaning_window_secs),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, value)| *value > MAX_WINDOW_SECS) {
            return Err(ServerError::Config(format!(
                "{} must be at most {} seconds",
                name, MAX_WINDOW_SECS
            )));
        }
        if self.upstream_timeout_ms > MAX_WINDOW_SECS * 1000 {
            return Err(ServerError::Config(format!(
                "UPSTREAM_TIMEOUT_MS must be at most {} ms",
                MAX_WINDOW_SECS * 1000
            )));
        }
        if let Some(url) = &self.upstream_base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ServerError::Config(format!(
                "UPSTREAM_BASE_URL must be an http(s) URL, got {}",
                url
            )));
        }
        Ok(())
    }

    pub fn timings(&self) -> LifecycleTimings {
        LifecycleTimings {
            reservation_window: Duration::from_secs(self.reservation_window_secs),
            dining_window: Duration::from_secs(self.dining_window_secs),
            cleaning_duration: Duration::from_secs(self.cleaning_duration_secs),
        }
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            layout: TableLayout::standard(self.table_count),
            timings: self.timings(),
            enforce_windows: self.enforce_windows,
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn upstream_cleaning_window(&self) -> Duration {
        Duration::from_secs(self.upstream_cleaning_window_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    match env_string(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key = key, value = %raw, "Invalid config value, using default");
            default
        }),
        None => default,
    }
}
