//! Table Server - 餐厅桌台生命周期服务
//!
//! # 架构概述
//!
//! - **桌台** (`tables`): 内存状态存储、状态机校验和自动推进调度
//! - **外部订单** (`upstream`): 同步模式下只读代理外部订单 API
//! - **HTTP API** (`api`): RESTful 接口
//!
//! # 模块结构
//!
//! ```text
//! table-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── tables/        # 存储、状态机、调度器、管理器
//! ├── upstream/      # 外部订单客户端和映射
//! ├── services/      # HTTP 服务
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志和环境初始化
//! ```

pub mod api;
pub mod core;
pub mod services;
pub mod tables;
pub mod upstream;
pub mod utils;

// Re-export 公共类型
pub use core::{BackgroundTasks, Config, Server, ServerError, ServerState};
pub use tables::{
    Clock, LifecycleEvent, LifecycleTimings, ManagerOptions, ManualClock, SystemClock, TableError,
    TableEvent, TableManager, Trigger,
};
pub use upstream::{FeedResource, HttpOrderFeed, OrderFeed, UpstreamError};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;
pub use utils::setup_environment;

pub fn print_banner() {
    println!(
        r#"
 _____     _     _
|_   _|_ _| |__ | | ___
  | |/ _` | '_ \| |/ _ \
  | | (_| | |_) | |  __/
  |_|\__,_|_.__/|_|\___|
    "#
    );
}
