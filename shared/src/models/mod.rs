//! Data models
//!
//! Shared between table-server and its clients (via API).
//! Local table records use camelCase JSON; upstream records keep the
//! snake_case shape the order API publishes.

pub mod dining_table;
pub mod external;

// Re-exports
pub use dining_table::*;
pub use external::*;
