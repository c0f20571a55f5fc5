//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Todo, TodoQuery},
};

/// Repository for Todo operations.
///
/// Absence is reported as `None`/`false`, never as an error.
pub trait TodoRepository: Send + Sync {
    /// Insert a new todo. The caller assigns id and timestamps.
    fn create(&self, todo: &Todo) -> impl Future<Output = DbResult<()>> + Send;

    /// Get a todo by ID.
    fn get(&self, id: &str) -> impl Future<Output = DbResult<Option<Todo>>> + Send;

    /// List todos matching the query, in insertion order.
    fn list(&self, query: &TodoQuery) -> impl Future<Output = DbResult<Vec<Todo>>> + Send;

    /// Overwrite the mutable fields of an existing todo.
    ///
    /// Returns `false` if no todo with that ID exists.
    fn update(&self, todo: &Todo) -> impl Future<Output = DbResult<bool>> + Send;

    /// Delete a todo by ID.
    ///
    /// Returns `false` if no todo with that ID existed.
    fn delete(&self, id: &str) -> impl Future<Output = DbResult<bool>> + Send;
}

/// Combined database interface.
///
/// Uses generic associated types so repositories borrow the backend's handle
/// without dynamic dispatch.
pub trait Database: Send + Sync {
    type Todos<'a>: TodoRepository
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the todo repository.
    fn todos(&self) -> Self::Todos<'_>;

    /// Release the underlying handle. Safe to call more than once.
    fn close(&self) -> impl Future<Output = ()> + Send;
}
