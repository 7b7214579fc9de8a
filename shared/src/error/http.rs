//! ErrorCode → HTTP status

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Client errors are 4xx; upstream trouble is 502/503 so callers know a
    /// retry may help.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed | Self::InvalidRequest | Self::RequiredField => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::TableNotFound => StatusCode::NOT_FOUND,
            Self::TableInvalidTransition => StatusCode::CONFLICT,
            Self::UpstreamInvalidResponse => StatusCode::BAD_GATEWAY,
            Self::NetworkError | Self::TimeoutError | Self::UpstreamDisabled => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
