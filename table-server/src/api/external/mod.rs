//! External order API 模块 (同步模式)
//!
//! 未配置 `UPSTREAM_BASE_URL` 时所有路由返回 503 `UpstreamDisabled`。
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/external/tables | GET | 代理外部桌台 |
//! | /api/external/transactions | GET | 代理外部订单 |
//! | /api/external/stands | GET | 各摊位空闲/占用统计 |
//! | /api/external/stats | GET | 订单状态数量和营收 |
//! | /api/synced/tables | GET | 本地桌台合并外部占用 (`?standId=`) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/external", external_routes())
        .route("/api/synced/tables", get(handler::synced_tables))
}

fn external_routes() -> Router<ServerState> {
    Router::new()
        .route("/tables", get(handler::tables))
        .route("/transactions", get(handler::transactions))
        .route("/stands", get(handler::stands))
        .route("/stats", get(handler::stats))
}
