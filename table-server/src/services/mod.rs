//! 服务层

pub mod https;

pub use https::{HttpsService, OneshotResult, build_app};
