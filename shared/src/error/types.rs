//! AppError and the JSON error envelope

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every HTTP handler.
///
/// Domain errors convert into it via `From`; `details` carries the
/// machine-readable context (offending field, current status, ...).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref()?.get(key)
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ---- shorthands ----

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// `<field> is required`, with the field name in `details.field`
    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_message(ErrorCode::RequiredField, format!("{} is required", field))
            .with_detail("field", field)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NetworkError, msg)
    }
}

/// Error body: `{ "code": 7005, "message": "...", "details": {...} }`
///
/// Successful responses are the bare JSON value; only failures are wrapped.
/// `data` stays in the envelope so clients can decode either shape with one
/// type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse<()> {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }

    /// Rebuild the server-side error from a decoded body (client side).
    ///
    /// `None` when the code is missing, zero or unknown.
    pub fn into_error(self) -> Option<AppError> {
        let code = ErrorCode::try_from(self.code?).ok()?;
        if code.is_success() {
            return None;
        }
        Some(AppError {
            code,
            message: self.message,
            details: self.details,
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self.code.category() {
            ErrorCategory::System => {
                tracing::error!(code = %self.code, message = %self.message, "System error");
            }
            ErrorCategory::Upstream => {
                tracing::warn!(code = %self.code, message = %self.message, "Upstream error");
            }
            ErrorCategory::General | ErrorCategory::Table => {}
        }

        let status = self.http_status();
        (status, axum::Json(ApiResponse::<()>::error(&self))).into_response()
    }
}
