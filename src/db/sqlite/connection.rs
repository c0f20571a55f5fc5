//! SQLite database connection and migration management.

use std::path::Path;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::debug;

use super::todo::SqliteTodoRepository;
use crate::db::{Database, DbError, DbResult};

// Embed migrations from data/sql/sqlite/ at compile time
static MIGRATOR: Migrator = sqlx::migrate!("./data/sql/sqlite");

/// SQLite database implementation.
///
/// Owns the connection pool. Repositories borrow it via associated types,
/// avoiding dynamic dispatch.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open a database at the given path, creating the file and its parent
    /// directory if they don't exist yet.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::Connection {
                    message: format!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        e
                    ),
                })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        debug!(path = %path.display(), "Opened SQLite database");
        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Pinned to a single connection that never expires, since every SQLite
    /// in-memory connection is its own database.
    pub async fn in_memory() -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Database for SqliteDatabase {
    type Todos<'a> = SqliteTodoRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    fn todos(&self) -> Self::Todos<'_> {
        SqliteTodoRepository { pool: &self.pool }
    }

    async fn close(&self) {
        if self.pool.is_closed() {
            debug!("SQLite pool already closed");
            return;
        }
        self.pool.close().await;
        debug!("Closed SQLite pool");
    }
}
