//! 错误码定义
//!
//! | 范围 | 分类 |
//! |------|------|
//! | 0xxx | 通用 |
//! | 7xxx | 桌台 |
//! | 90xx | 系统 |
//! | 95xx | 外部订单 API |
//!
//! Codes serialize as bare numbers so non-Rust clients can switch on them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ---- 0xxx ----
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    InvalidRequest = 5,
    /// A required input field is missing or blank
    RequiredField = 7,

    // ---- 7xxx ----
    TableNotFound = 7001,
    /// Requested event is not legal from the table's current status
    TableInvalidTransition = 7005,

    // ---- 90xx ----
    InternalError = 9001,
    NetworkError = 9003,
    TimeoutError = 9004,
    ConfigError = 9005,

    // ---- 95xx ----
    /// `UPSTREAM_BASE_URL` is not set
    UpstreamDisabled = 9501,
    /// Upstream answered with a non-2xx status, `success: false` or bad JSON
    UpstreamInvalidResponse = 9502,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 14] = [
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::InvalidRequest,
        ErrorCode::RequiredField,
        ErrorCode::TableNotFound,
        ErrorCode::TableInvalidTransition,
        ErrorCode::InternalError,
        ErrorCode::NetworkError,
        ErrorCode::TimeoutError,
        ErrorCode::ConfigError,
        ErrorCode::UpstreamDisabled,
        ErrorCode::UpstreamInvalidResponse,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default English message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "OK",
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableInvalidTransition => "Transition not allowed from current table status",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::UpstreamDisabled => "Upstream order API is not configured",
            ErrorCode::UpstreamInvalidResponse => "Upstream order API returned an invalid response",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Number that is not a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
