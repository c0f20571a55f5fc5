//! MCP tool implementations
//!
//! Tool handlers validate arguments beyond what the JSON schema enforces,
//! call the todo service, and render every outcome as an [`Envelope`].

mod todos;

#[cfg(test)]
mod todos_test;

pub use todos::*;

use chrono::NaiveDate;
use rmcp::model::CallToolResult;
use tracing::{debug, warn};
use uuid::Uuid;

use super::envelope::Envelope;
use crate::service::ServiceError;

/// Check that `id` is a UUID.
pub(crate) fn parse_todo_id(id: &str) -> Result<&str, Envelope> {
    Uuid::parse_str(id)
        .map(|_| id)
        .map_err(|_| Envelope::error("Invalid Todo ID"))
}

/// Parse a strict `YYYY-MM-DD` date.
pub(crate) fn parse_date(date: &str) -> Result<NaiveDate, Envelope> {
    let well_formed = date.len() == 10
        && date
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });

    if !well_formed {
        return Err(Envelope::error("Date must be in YYYY-MM-DD format"));
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| Envelope::error(format!("Invalid date '{}': {}", date, e)))
}

/// Turn a service failure into an error envelope, logging store faults.
pub(crate) fn service_failure(context: &str, err: ServiceError) -> CallToolResult {
    match &err {
        ServiceError::Validation { message } => debug!(%message, "{}", context),
        ServiceError::Store(source) => warn!(error = %source, "{}", context),
    }
    Envelope::failure(context, err).into()
}

/// Error envelope for an absent todo.
pub(crate) fn not_found(context: &str, id: &str) -> CallToolResult {
    Envelope::failure(context, format!("Todo with ID {} not found", id)).into()
}
