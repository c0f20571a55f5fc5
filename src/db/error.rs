//! Database error types.
//!
//! This module provides abstracted error types for database operations.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! The error types are storage-backend agnostic.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Invalid data: {message} (hint: {help})")]
    #[diagnostic(code(todo_mcp::db::invalid_data))]
    InvalidData { message: String, help: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(todo_mcp::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(code(todo_mcp::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(
        code(todo_mcp::db::connection_error),
        help("Check that TODO_DB_FOLDER points to a writable directory.")
    )]
    Connection { message: String },
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        DbError::Database {
            message: e.to_string(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
