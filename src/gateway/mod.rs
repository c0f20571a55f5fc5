//! HTTP SSE gateway
//!
//! Serves the MCP tool registry to exactly one SSE client at a time, gated
//! by an optional shared-secret header.

mod auth;
mod error;
mod handlers;
mod routes;
mod session;
mod signal;
mod state;


pub use auth::AuthPolicy;
pub use error::{AUTH_REALM, GatewayError};
pub use routes::create_router;
pub use session::{SESSION_CLOSE_TIMEOUT, SessionStream};
pub use signal::wait_for_signal;
pub use state::Gateway;

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Initialize the tracing subscriber with an env filter, writing to stderr.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_mcp=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Bind the listener and serve until [`Gateway::shutdown`] completes.
pub async fn run<D: Database + 'static>(
    config: &Config,
    gateway: Arc<Gateway<D>>,
) -> Result<(), GatewayError> {
    let addr = format!("{}:{}", config.host, config.port);
    let host = config.host.trim_start_matches('[').trim_end_matches(']');
    let listener = tokio::net::TcpListener::bind((host, config.port))
        .await
        .map_err(|source| GatewayError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!("Todo MCP Server running on HTTP SSE transport at {}", addr);
    info!("SSE endpoint: {}", config.sse_url());
    info!("Message endpoint: {}", config.messages_url());

    let app = create_router(Arc::clone(&gateway), config).layer(TraceLayer::new_for_http());

    axum::serve(listener, app)
        .with_graceful_shutdown(gateway.shutdown_token().cancelled_owned())
        .await
        .map_err(GatewayError::Serve)
}
