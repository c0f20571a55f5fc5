use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;

pub const AUTH_REALM: &str = "Todo MCP Server";

#[derive(Error, Diagnostic, Debug)]
pub enum GatewayError {
    #[error("Unauthorized")]
    #[diagnostic(
        code(todo_mcp::gateway::unauthorized),
        help("Send the header `Authorization: <scheme> <token>` matching TODO_HTTP_AUTH_TOKEN")
    )]
    Unauthorized { scheme: String },

    #[error("Server is shutting down")]
    #[diagnostic(code(todo_mcp::gateway::shutting_down))]
    ShuttingDown,

    #[error("Missing sessionId query parameter")]
    #[diagnostic(code(todo_mcp::gateway::missing_session_id))]
    MissingSessionId,

    #[error("No active SSE session")]
    #[diagnostic(
        code(todo_mcp::gateway::no_active_session),
        help("Open the SSE endpoint first and use the sessionId it announces")
    )]
    NoActiveSession,

    #[error("Session {session_id} is not the active session")]
    #[diagnostic(code(todo_mcp::gateway::stale_session))]
    StaleSession { session_id: String },

    #[error("SSE session closed")]
    #[diagnostic(code(todo_mcp::gateway::session_closed))]
    SessionClosed,

    #[error("Invalid MCP message: {message}")]
    #[diagnostic(code(todo_mcp::gateway::invalid_message))]
    InvalidMessage { message: String },

    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(todo_mcp::gateway::bind),
        help("Is another process using the port? Set TODO_HTTP_PORT or pass --port")
    )]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    #[diagnostic(code(todo_mcp::gateway::serve))]
    Serve(#[source] std::io::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            GatewayError::MissingSessionId | GatewayError::InvalidMessage { .. } => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::ShuttingDown
            | GatewayError::NoActiveSession
            | GatewayError::StaleSession { .. }
            | GatewayError::SessionClosed => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Bind { .. } | GatewayError::Serve(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, self.to_string()).into_response();

        if let GatewayError::Unauthorized { scheme } = &self {
            let challenge = format!("{} realm=\"{}\"", scheme, AUTH_REALM);
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }

        response
    }
}
