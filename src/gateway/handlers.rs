use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{KeepAlive, KeepAliveStream, Sse};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::error::GatewayError;
use super::session::SessionStream;
use super::state::Gateway;
use crate::db::Database;

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// `GET <ssePath>`: open the session stream, evicting any previous session.
#[instrument(skip_all)]
pub async fn connect<D: Database + 'static>(
    State(gateway): State<Arc<Gateway<D>>>,
    headers: HeaderMap,
) -> Result<Sse<KeepAliveStream<SessionStream>>, GatewayError> {
    debug!("Received SSE connection request");

    if gateway.is_shutting_down() {
        return Err(GatewayError::ShuttingDown);
    }
    gateway.authorize(&headers)?;

    let stream = gateway.open_session().await?;
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// `POST <messagesPath>?sessionId=<id>`: forward one JSON-RPC message.
#[instrument(skip_all)]
pub async fn post_message<D: Database + 'static>(
    State(gateway): State<Arc<Gateway<D>>>,
    Query(query): Query<MessageQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), GatewayError> {
    if gateway.is_shutting_down() {
        return Err(GatewayError::ShuttingDown);
    }
    gateway.authorize(&headers)?;

    let session_id = query
        .session_id
        .filter(|id| !id.is_empty())
        .ok_or(GatewayError::MissingSessionId)?;

    gateway.route(&session_id, &body).await?;
    Ok((StatusCode::ACCEPTED, "Accepted"))
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
