//! Todo domain service.
//!
//! Validates input and applies the todo lifecycle rules on top of the
//! storage-agnostic [`Database`](crate::db::Database) trait. Expected
//! outcomes are values: a missing todo is `None`, bad input is
//! [`ServiceError::Validation`].

mod error;
mod todos;

#[cfg(test)]
mod todos_test;

pub use error::{ServiceError, ServiceResult};
pub use todos::TodoService;
