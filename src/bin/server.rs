//! Todo MCP server binary.
//!
//! Opens the SQLite store, then serves the MCP tools over the SSE gateway
//! until SIGINT or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use todo_mcp::config::{self, Config};
use todo_mcp::db::{Database, DbError, SqliteDatabase};
use todo_mcp::gateway::{self, Gateway, GatewayError};
use todo_mcp::service::TodoService;
use tracing::{debug, info};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Failed to load env file: {0}")]
    #[diagnostic(code(todo_mcp::binary::env_file))]
    EnvFile(#[from] dotenvy::Error),

    #[error("Database error: {0}")]
    #[diagnostic(code(todo_mcp::binary::database))]
    Database(#[from] DbError),

    #[error("Gateway error: {0}")]
    #[diagnostic(code(todo_mcp::binary::gateway))]
    Gateway(#[from] GatewayError),
}

#[derive(Parser)]
#[command(name = "todo-mcp")]
#[command(author, version, about = "Todo list MCP server over HTTP SSE", long_about = None)]
struct Cli {
    /// Host address to bind to (env: TODO_HTTP_HOST, default 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (env: TODO_HTTP_PORT, default 4041)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the database (env: TODO_DB_FOLDER, default ~/.todo-list-mcp)
    #[arg(long)]
    db_folder: Option<PathBuf>,

    /// Database file name (env: TODO_DB_FILE, default todos.sqlite)
    #[arg(long)]
    db_file: Option<String>,

    /// Env file to load before reading settings (default: .env, if present)
    #[arg(long)]
    env_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new();
        if let Some(host) = self.host {
            config = config.with_host(host);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(folder) = self.db_folder {
            config = config.with_db_folder(folder);
        }
        if let Some(file) = self.db_file {
            config = config.with_db_file(file);
        }
        config
    }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let env_file = config::load_env_file(cli.env_file.as_deref()).map_err(BinaryError::from)?;

    gateway::init_tracing();
    if let Some(path) = env_file {
        debug!("Loaded environment from {}", path.display());
    }

    run(cli.into_config()).await?;
    Ok(())
}

async fn run(config: Config) -> Result<(), BinaryError> {
    let db_path = config.db_path();
    info!("Opening database at {}", db_path.display());

    let db = SqliteDatabase::open(&db_path).await?;
    if let Err(e) = db.migrate().await {
        db.close().await;
        return Err(e.into());
    }
    info!("Database migrations complete");

    let db = Arc::new(db);
    let gateway = Gateway::new(TodoService::<SqliteDatabase>::new(Arc::clone(&db)), &config);

    if config.requires_auth() {
        info!("Authentication enabled ({} scheme)", config.auth_scheme);
    }

    // Repeated signals land on an already-closing gateway
    let signals = {
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move {
            loop {
                gateway::wait_for_signal().await;
                gateway.shutdown().await;
            }
        })
    };

    let served = gateway::run(&config, Arc::clone(&gateway)).await;

    signals.abort();
    db.close().await;

    served?;
    info!("Server stopped");
    Ok(())
}
