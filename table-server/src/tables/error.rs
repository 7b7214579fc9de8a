use shared::error::{AppError, ErrorCode};
use shared::models::TableStatus;
use thiserror::Error;

use super::lifecycle::LifecycleEvent;

/// Table lifecycle errors
///
/// All of them are local and recoverable: the caller re-fetches state or
/// resupplies input and tries again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Table {0} not found")]
    NotFound(String),

    #[error("Cannot {event} table while it is {status}")]
    InvalidTransition {
        status: TableStatus,
        event: LifecycleEvent,
    },

    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::NotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, format!("Table {} not found", id))
                    .with_detail("id", id)
            }
            TableError::InvalidTransition { status, event } => AppError::with_message(
                ErrorCode::TableInvalidTransition,
                format!("Cannot {} table while it is {}", event, status),
            )
            .with_detail("status", status.as_str())
            .with_detail("event", event.as_str()),
            TableError::MissingInput(field) => AppError::required(field),
            TableError::InvalidInput(msg) => AppError::validation(msg),
        }
    }
}

pub type TableResult<T> = Result<T, TableError>;
