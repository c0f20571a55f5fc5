//! Domain models for the todo database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// UUID v4 string used as the todo identifier.
pub type Id = String;

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters for listing todos. All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct TodoQuery {
    /// Filter by completion state.
    pub completed: Option<bool>,
    /// Case-insensitive substring of the title. Matched literally, `%` and `_` included.
    pub title_contains: Option<String>,
    /// Calendar date (UTC) of `created_at`.
    pub created_on: Option<NaiveDate>,
}

impl TodoQuery {
    /// Only todos that are not completed.
    pub fn active() -> Self {
        Self {
            completed: Some(false),
            ..Default::default()
        }
    }

    pub fn title_contains(term: impl Into<String>) -> Self {
        Self {
            title_contains: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn created_on(date: NaiveDate) -> Self {
        Self {
            created_on: Some(date),
            ..Default::default()
        }
    }
}
