//! Gateway state: the single session slot and the shutdown latch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use axum::http::HeaderMap;
use rmcp::model::ClientJsonRpcMessage;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::auth::AuthPolicy;
use super::error::GatewayError;
use super::session::{SESSION_CLOSE_TIMEOUT, Session, SessionStream};
use crate::config::Config;
use crate::db::Database;
use crate::mcp::McpServer;
use crate::service::TodoService;

/// Shared state behind every gateway route.
///
/// At most one session lives in the slot. A new connect evicts the previous
/// session before installing its own, all under the slot lock.
pub struct Gateway<D: Database> {
    server: McpServer<D>,
    auth: AuthPolicy,
    messages_path: String,
    slot: Mutex<Option<Session>>,
    shutting_down: AtomicBool,
    shutdown: CancellationToken,
}

impl<D: Database + 'static> Gateway<D> {
    pub fn new(service: TodoService<D>, config: &Config) -> Arc<Self> {
        Arc::new(Self {
            server: McpServer::new(service),
            auth: AuthPolicy::from_config(config),
            messages_path: config.messages_path.clone(),
            slot: Mutex::new(None),
            shutting_down: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        })
    }

    /// Token cancelled once shutdown has finished closing the session.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), GatewayError> {
        self.auth.check(headers)
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.slot.lock().await.as_ref().map(|session| session.id.clone())
    }

    /// Replace whatever session is active with a fresh one.
    #[instrument(skip(self))]
    pub async fn open_session(self: &Arc<Self>) -> Result<SessionStream, GatewayError> {
        let mut slot = self.slot.lock().await;

        if let Some(previous) = slot.take() {
            info!(session_id = %previous.id, "Closing existing SSE session before accepting new connection");
            previous.close(SESSION_CLOSE_TIMEOUT).await;
        }

        // Shutdown may have started while the previous session was closing
        if self.is_shutting_down() {
            return Err(GatewayError::ShuttingDown);
        }

        let (session, stream) = Session::start(
            self.server.clone(),
            &self.messages_path,
            self.shutdown.child_token(),
        );

        info!(session_id = %session.id, "SSE connection established");
        debug!(
            session_id = %session.id,
            "Send MCP messages via POST {}?sessionId={}", self.messages_path, session.id
        );

        tokio::spawn(release_when_cancelled(
            Arc::downgrade(self),
            session.id.clone(),
            session.token().clone(),
        ));

        *slot = Some(session);
        Ok(stream)
    }

    /// Decode `body` and hand it to the session named `session_id`.
    pub async fn route(&self, session_id: &str, body: &[u8]) -> Result<(), GatewayError> {
        let slot = self.slot.lock().await;

        let session = slot.as_ref().ok_or(GatewayError::NoActiveSession)?;
        if session.id != session_id {
            return Err(GatewayError::StaleSession {
                session_id: session_id.to_string(),
            });
        }

        let message: ClientJsonRpcMessage =
            serde_json::from_slice(body).map_err(|e| GatewayError::InvalidMessage {
                message: e.to_string(),
            })?;

        session.forward(message)
    }

    /// Close the active session and stop the HTTP server. Idempotent.
    pub async fn shutdown(&self) {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("Shutting down gateway");

        let active = self.slot.lock().await.take();
        if let Some(session) = active {
            session.close(SESSION_CLOSE_TIMEOUT).await;
        }

        self.shutdown.cancel();
    }

    /// Clear the slot if it still holds `session_id`.
    async fn release(&self, session_id: &str) {
        let mut slot = self.slot.lock().await;
        if slot.as_ref().is_some_and(|session| session.id == session_id) {
            slot.take();
            info!(%session_id, "SSE session closed");
        }
    }
}

async fn release_when_cancelled<D: Database + 'static>(
    gateway: Weak<Gateway<D>>,
    session_id: String,
    token: CancellationToken,
) {
    token.cancelled().await;
    if let Some(gateway) = gateway.upgrade() {
        gateway.release(&session_id).await;
    }
}
