use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Upstream order API errors
///
/// None of these touch local table state; the client can simply retry.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Upstream order API is not configured")]
    Disabled,

    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Upstream reported failure: {}", .0.as_deref().unwrap_or("no message"))]
    Unsuccessful(Option<String>),

    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        let message = err.to_string();
        match err {
            UpstreamError::Disabled => AppError::new(ErrorCode::UpstreamDisabled),
            UpstreamError::Request(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, message)
            }
            UpstreamError::Request(_) => AppError::network(message),
            UpstreamError::Status(status) => {
                AppError::with_message(ErrorCode::UpstreamInvalidResponse, message)
                    .with_detail("status", status)
            }
            UpstreamError::Unsuccessful(_) | UpstreamError::Decode(_) => {
                AppError::with_message(ErrorCode::UpstreamInvalidResponse, message)
            }
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;
