//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tables`] - 桌台生命周期接口
//! - [`external`] - 外部订单代理和同步视图

pub mod external;
pub mod health;
pub mod tables;
