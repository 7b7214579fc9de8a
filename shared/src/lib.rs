//! Shared types for the table status service
//!
//! Wire models and the unified error system, used by the server and by any
//! client that talks to its JSON API.

pub mod error;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{Table, TableStatus, TableView};
