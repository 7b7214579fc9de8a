//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Duration type (milliseconds)
pub type Millis = i64;
