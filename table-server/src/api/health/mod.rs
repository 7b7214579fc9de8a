//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 存活检查、版本和 epoch |
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "epoch": "5f0c…",
//!   "tables": 12,
//!   "syncedMode": false,
//!   "enforceWindows": true,
//!   "uptimeSeconds": 42
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::Instant;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// 进程实例 ID，变化说明服务器重启过 (状态已丢失)
    epoch: String,
    tables: usize,
    synced_mode: bool,
    enforce_windows: bool,
    uptime_seconds: u64,
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    START_TIME.get_or_init(Instant::now).elapsed().as_secs()
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        epoch: state.tables.epoch().to_string(),
        tables: state.tables.stats().total,
        synced_mode: state.feed.is_some(),
        enforce_windows: state.tables.enforce_windows(),
        uptime_seconds: get_uptime_seconds(),
    })
}
