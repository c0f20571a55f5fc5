//! Todo service error types.

use miette::Diagnostic;
use thiserror::Error;

use crate::db::DbError;

/// Errors raised by [`TodoService`](super::TodoService) operations.
#[derive(Error, Diagnostic, Debug)]
pub enum ServiceError {
    #[error("{message}")]
    #[diagnostic(code(todo_mcp::service::validation))]
    Validation { message: String },

    #[error(transparent)]
    #[diagnostic(code(todo_mcp::service::store))]
    Store(#[from] DbError),
}

impl ServiceError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
        }
    }
}

/// Result type for todo service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
