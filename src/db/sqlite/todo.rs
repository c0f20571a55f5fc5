//! SQLite TodoRepository implementation.

use sqlx::{Row, SqlitePool};

use crate::db::utils::{format_timestamp, parse_timestamp};
use crate::db::{DbResult, Todo, TodoQuery, TodoRepository};

const TODO_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

/// SQLx-backed todo repository.
pub struct SqliteTodoRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
}

impl TodoRepository for SqliteTodoRepository<'_> {
    async fn create(&self, todo: &Todo) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO todo (id, title, description, completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(format_timestamp(&todo.created_at))
        .bind(format_timestamp(&todo.updated_at))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> DbResult<Option<Todo>> {
        let sql = format!("SELECT {} FROM todo WHERE id = ?", TODO_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(row_to_todo).transpose()
    }

    async fn list(&self, query: &TodoQuery) -> DbResult<Vec<Todo>> {
        // Build filter conditions
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_values: Vec<String> = Vec::new();

        if let Some(completed) = query.completed {
            conditions.push(format!("completed = {}", i32::from(completed)));
        }

        // instr() rather than LIKE so '%' and '_' in the term match literally
        if let Some(term) = &query.title_contains {
            conditions.push("instr(lower(title), lower(?)) > 0".to_string());
            bind_values.push(term.clone());
        }

        if let Some(date) = &query.created_on {
            conditions.push("substr(created_at, 1, 10) = ?".to_string());
            bind_values.push(date.format("%Y-%m-%d").to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {} FROM todo {} ORDER BY rowid ASC",
            TODO_COLUMNS, where_clause
        );

        let mut query_builder = sqlx::query(&sql);
        for value in &bind_values {
            query_builder = query_builder.bind(value);
        }

        let rows = query_builder.fetch_all(self.pool).await?;

        rows.iter().map(row_to_todo).collect()
    }

    async fn update(&self, todo: &Todo) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE todo
            SET title = ?, description = ?, completed = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(format_timestamp(&todo.updated_at))
        .bind(&todo.id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM todo WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Convert a database row to a Todo model.
fn row_to_todo(row: &sqlx::sqlite::SqliteRow) -> DbResult<Todo> {
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Todo {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
