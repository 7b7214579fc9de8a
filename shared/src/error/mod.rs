//! 统一错误体系
//!
//! - [`ErrorCode`] - 数字错误码，按范围分类
//! - [`ErrorCategory`] - 0xxx 通用 / 7xxx 桌台 / 95xx 外部订单 / 9xxx 系统
//! - [`AppError`] - handler 返回的错误，实现 `IntoResponse`
//! - [`ApiResponse`] - 错误响应体
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::TableInvalidTransition, "Table is not reserved")
//!     .with_detail("status", "available");
//! assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
//!
//! let body = ApiResponse::<()>::error(&err);
//! assert_eq!(body.code, Some(7005));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
