//! Todo CRUD, search, and summary operations.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use super::{ServiceError, ServiceResult};
use crate::db::utils::{generate_entity_id, next_timestamp};
use crate::db::{Database, Todo, TodoQuery, TodoRepository};

/// Todo operations over a shared database handle.
pub struct TodoService<D: Database> {
    db: Arc<D>,
}

// Manual Clone impl - only the Arc needs cloning, not D
impl<D: Database> Clone for TodoService<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

impl<D: Database> TodoService<D> {
    pub fn new(db: impl Into<Arc<D>>) -> Self {
        Self { db: db.into() }
    }

    /// Create a todo. Both fields must be non-empty after trimming.
    #[instrument(skip(self))]
    pub async fn create(&self, title: &str, description: &str) -> ServiceResult<Todo> {
        let title = required(title, "Title is required")?;
        let description = required(description, "Description is required")?;

        let now = next_timestamp(None);
        let todo = Todo {
            id: generate_entity_id(),
            title,
            description,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        self.db.todos().create(&todo).await?;
        debug!(id = %todo.id, "Created todo");
        Ok(todo)
    }

    pub async fn get(&self, id: &str) -> ServiceResult<Option<Todo>> {
        Ok(self.db.todos().get(id).await?)
    }

    /// Update title and/or description. At least one must be given.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: &str,
        title: Option<&str>,
        description: Option<&str>,
    ) -> ServiceResult<Option<Todo>> {
        if title.is_none() && description.is_none() {
            return Err(ServiceError::validation(
                "At least one field (title or description) must be provided",
            ));
        }
        let title = title
            .map(|t| required(t, "Title cannot be empty"))
            .transpose()?;
        let description = description
            .map(|d| required(d, "Description cannot be empty"))
            .transpose()?;

        let Some(mut todo) = self.get(id).await? else {
            return Ok(None);
        };

        if let Some(title) = title {
            todo.title = title;
        }
        if let Some(description) = description {
            todo.description = description;
        }
        todo.updated_at = next_timestamp(Some(todo.updated_at));

        self.persist(todo).await
    }

    /// Mark a todo completed. Completing an already completed todo succeeds
    /// and only refreshes `updated_at`.
    #[instrument(skip(self))]
    pub async fn complete(&self, id: &str) -> ServiceResult<Option<Todo>> {
        let Some(mut todo) = self.get(id).await? else {
            return Ok(None);
        };

        todo.completed = true;
        todo.updated_at = next_timestamp(Some(todo.updated_at));

        self.persist(todo).await
    }

    /// Delete a todo. Returns whether it existed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ServiceResult<bool> {
        Ok(self.db.todos().delete(id).await?)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Todo>> {
        Ok(self.db.todos().list(&TodoQuery::default()).await?)
    }

    pub async fn list_active(&self) -> ServiceResult<Vec<Todo>> {
        Ok(self.db.todos().list(&TodoQuery::active()).await?)
    }

    /// Case-insensitive substring match on the title.
    pub async fn search_by_title(&self, term: &str) -> ServiceResult<Vec<Todo>> {
        Ok(self.db.todos().list(&TodoQuery::title_contains(term)).await?)
    }

    /// Todos created on the given (UTC) date.
    pub async fn search_by_date(&self, date: NaiveDate) -> ServiceResult<Vec<Todo>> {
        Ok(self.db.todos().list(&TodoQuery::created_on(date)).await?)
    }

    /// Short markdown digest of active todos: a count and their titles.
    pub async fn summarize_active(&self) -> ServiceResult<String> {
        let active = self.list_active().await?;
        Ok(summarize(&active))
    }

    // A row that vanished between read and write is reported as absent.
    async fn persist(&self, todo: Todo) -> ServiceResult<Option<Todo>> {
        if self.db.todos().update(&todo).await? {
            Ok(Some(todo))
        } else {
            Ok(None)
        }
    }
}

fn required(value: &str, message: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(message));
    }
    Ok(trimmed.to_string())
}

fn summarize(active: &[Todo]) -> String {
    if active.is_empty() {
        return "No active todos found.".to_string();
    }

    let headline = match active.len() {
        1 => "There is 1 active todo.".to_string(),
        n => format!("There are {} active todos.", n),
    };
    let titles: Vec<String> = active
        .iter()
        .enumerate()
        .map(|(i, todo)| format!("{}. {}", i + 1, todo.title))
        .collect();

    format!(
        "# Active Todos Summary\n\n{}\n\n{}",
        headline,
        titles.join("\n")
    )
}
