//! Table lifecycle API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/tables | GET | 所有桌台 (`?status=` 过滤) |
//! | /api/tables/stats | GET | 各状态数量 |
//! | /api/tables/{id} | GET | 单个桌台 |
//! | /api/tables/number/{number} | GET | 按桌号查询 |
//! | /api/tables/{id}/reserve | POST | 预订 `{"customerName": "..."}` |
//! | /api/tables/{id}/occupy | POST | 入座 |
//! | /api/tables/{id}/finish | POST | 用餐结束 |
//! | /api/tables/{id}/clean | POST | 开始清洁 |
//! | /api/tables/{id}/clean/complete | POST | 完成清洁 (幂等) |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/stats", get(handler::stats))
        .route("/number/{number}", get(handler::get_by_number))
        .route("/{id}", get(handler::get_by_id));

    let lifecycle_routes = Router::new()
        .route("/{id}/reserve", post(handler::reserve))
        .route("/{id}/occupy", post(handler::occupy))
        .route("/{id}/finish", post(handler::finish))
        .route("/{id}/clean", post(handler::start_cleaning))
        .route("/{id}/clean/complete", post(handler::complete_cleaning));

    read_routes.merge(lifecycle_routes)
}
