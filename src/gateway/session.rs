//! One live SSE session and the event stream handed to its client.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::response::sse::Event;
use futures::SinkExt;
use futures::channel::mpsc;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use rmcp::model::{
    ClientJsonRpcMessage, ClientNotification, ClientRequest, ErrorCode, JsonRpcMessage,
    JsonRpcNotification, JsonRpcRequest, RequestId, ServerJsonRpcMessage,
};
use rmcp::{ErrorData, ServiceExt};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use super::error::GatewayError;
use crate::db::Database;
use crate::mcp::McpServer;

/// Upper bound for tearing down a replaced or shut-down session.
pub const SESSION_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

const OUTBOUND_BUFFER: usize = 32;

/// JSON-RPC code for requests that arrive before the handshake completes.
const SERVER_NOT_INITIALIZED: ErrorCode = ErrorCode(-32002);

/// The gateway's handle on the running session.
pub(crate) struct Session {
    pub(crate) id: String,
    inbound: mpsc::UnboundedSender<ClientJsonRpcMessage>,
    token: CancellationToken,
    service: JoinHandle<()>,
}

impl Session {
    /// Spawn the rmcp service for a new session.
    ///
    /// Returns the slot handle and the client-facing SSE stream.
    pub(crate) fn start<D: Database + 'static>(
        server: McpServer<D>,
        messages_path: &str,
        token: CancellationToken,
    ) -> (Self, SessionStream) {
        let id = uuid::Uuid::new_v4().to_string();
        let (inbound, inbound_rx) = mpsc::unbounded();
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);

        let service = tokio::spawn(serve(
            server,
            id.clone(),
            outbound_tx,
            inbound_rx,
            token.clone(),
        ));

        let endpoint = format!("{}?sessionId={}", messages_path, id);
        let stream = SessionStream::new(endpoint, outbound_rx, token.clone());

        let session = Self {
            id,
            inbound,
            token,
            service,
        };
        (session, stream)
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Queue a message for the session's service.
    pub(crate) fn forward(&self, message: ClientJsonRpcMessage) -> Result<(), GatewayError> {
        self.inbound
            .unbounded_send(message)
            .map_err(|_| GatewayError::SessionClosed)
    }

    /// Cancel the session and wait for its service, bounded by `timeout`.
    ///
    /// The service task is aborted if it does not stop in time. Failures are
    /// logged only.
    pub(crate) async fn close(self, timeout: Duration) {
        let Session {
            id,
            inbound,
            token,
            service,
        } = self;

        token.cancel();
        drop(inbound);

        let abort = service.abort_handle();
        match tokio::time::timeout(timeout, service).await {
            Ok(Ok(())) => debug!(session_id = %id, "Session closed"),
            Ok(Err(e)) => warn!(session_id = %id, error = %e, "Session task failed while closing"),
            Err(_) => {
                warn!(session_id = %id, ?timeout, "Session did not close in time; aborting");
                abort.abort();
            }
        }
    }
}

/// Run the rmcp server and its relay until either side ends.
async fn serve<D: Database + 'static>(
    server: McpServer<D>,
    session_id: String,
    sse: mpsc::Sender<ServerJsonRpcMessage>,
    client: mpsc::UnboundedReceiver<ClientJsonRpcMessage>,
    token: CancellationToken,
) {
    let (service_in, service_in_rx) = mpsc::unbounded();
    let (service_out_tx, service_out) = mpsc::channel(OUTBOUND_BUFFER);

    let service = {
        let session_id = session_id.clone();
        let token = token.clone();
        async move {
            match server
                .serve_with_ct((service_out_tx, service_in_rx), token.clone())
                .await
            {
                Ok(running) => {
                    info!(%session_id, "MCP session initialized");
                    match running.waiting().await {
                        Ok(reason) => debug!(%session_id, ?reason, "MCP service stopped"),
                        Err(e) => warn!(%session_id, error = %e, "MCP service task failed"),
                    }
                }
                Err(e) => {
                    debug!(%session_id, error = %e, "MCP session ended before initialization")
                }
            }
            token.cancel();
        }
    };

    let relay = Relay {
        session_id,
        phase: Phase::AwaitingInitialize,
        in_flight: None,
        client,
        service_in,
        service_out,
        sse,
    };

    tokio::join!(service, relay.run(token));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingInitialize,
    AwaitingInitialized,
    Ready,
}

/// Sits between the client's POSTs and the rmcp service.
///
/// Before the handshake it answers stray requests itself and drops stray
/// notifications, so they never reach the service. Afterwards it forwards
/// one request at a time: the next client message is not read until the
/// reply to the current request has been relayed to the stream.
struct Relay {
    session_id: String,
    phase: Phase,
    in_flight: Option<RequestId>,
    client: mpsc::UnboundedReceiver<ClientJsonRpcMessage>,
    service_in: mpsc::UnboundedSender<ClientJsonRpcMessage>,
    service_out: mpsc::Receiver<ServerJsonRpcMessage>,
    sse: mpsc::Sender<ServerJsonRpcMessage>,
}

impl Relay {
    async fn run(mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                message = self.service_out.next() => {
                    let Some(message) = message else { break };
                    if !self.deliver(message).await {
                        break;
                    }
                }
                _ = token.cancelled() => break,
                message = self.client.next(), if self.in_flight.is_none() => {
                    let Some(message) = message else { break };
                    if !self.admit(message).await {
                        break;
                    }
                }
            }
        }
        debug!(session_id = %self.session_id, "Session relay stopped");
        token.cancel();
    }

    /// Pass a service message to the stream, clearing the pending request
    /// it answers.
    async fn deliver(&mut self, message: ServerJsonRpcMessage) -> bool {
        let answered = match &message {
            JsonRpcMessage::Response(response) => Some(&response.id),
            JsonRpcMessage::Error(error) => Some(&error.id),
            _ => None,
        };
        if answered.is_some() && answered == self.in_flight.as_ref() {
            self.in_flight = None;
        }
        self.sse.send(message).await.is_ok()
    }

    /// Forward a client message to the service, or answer it here when the
    /// handshake has not reached the point where the service can take it.
    async fn admit(&mut self, message: ClientJsonRpcMessage) -> bool {
        match (self.phase, &message) {
            (
                Phase::AwaitingInitialize,
                JsonRpcMessage::Request(JsonRpcRequest {
                    request: ClientRequest::InitializeRequest(_),
                    ..
                }),
            ) => self.phase = Phase::AwaitingInitialized,
            (
                Phase::AwaitingInitialized,
                JsonRpcMessage::Notification(JsonRpcNotification {
                    notification: ClientNotification::InitializedNotification(_),
                    ..
                }),
            ) => self.phase = Phase::Ready,
            (Phase::Ready, _) => {}
            (phase, JsonRpcMessage::Request(request)) => {
                debug!(
                    session_id = %self.session_id,
                    ?phase,
                    id = %request.id,
                    "Rejecting request before initialization"
                );
                let reply = ServerJsonRpcMessage::error(
                    ErrorData::new(SERVER_NOT_INITIALIZED, "Server not initialized", None),
                    request.id.clone(),
                );
                return self.sse.send(reply).await.is_ok();
            }
            (phase, _) => {
                debug!(
                    session_id = %self.session_id,
                    ?phase,
                    "Dropping message received before initialization"
                );
                return true;
            }
        }

        if let JsonRpcMessage::Request(request) = &message {
            self.in_flight = Some(request.id.clone());
        }
        self.service_in.unbounded_send(message).is_ok()
    }
}

/// SSE body for one session.
///
/// Emits the `endpoint` event, then one `message` event per outbound
/// JSON-RPC message. Ends when the session is cancelled. Dropping it (the
/// client went away) cancels the session.
pub struct SessionStream {
    inner: BoxStream<'static, Result<Event, axum::Error>>,
    _guard: DropGuard,
}

impl SessionStream {
    fn new(
        endpoint: String,
        outbound: mpsc::Receiver<ServerJsonRpcMessage>,
        token: CancellationToken,
    ) -> Self {
        let announce =
            stream::once(async move { Ok(Event::default().event("endpoint").data(endpoint)) });
        let messages =
            outbound.map(|message| Event::default().event("message").json_data(&message));

        let inner = announce
            .chain(messages)
            .take_until(token.clone().cancelled_owned())
            .boxed();

        Self {
            inner,
            _guard: token.drop_guard(),
        }
    }
}

impl Stream for SessionStream {
    type Item = Result<Event, axum::Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}
