//! Uniform tool response envelope.
//!
//! Every tool invocation produces exactly one envelope. Errors stay inside the
//! MCP result (`is_error: true`) instead of becoming JSON-RPC faults, so the
//! session survives any single failed call.

use std::fmt::Display;

use rmcp::model::{CallToolResult, Content};

/// Outcome of a tool call: rendered success text or an error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    Success(String),
    Error(String),
}

impl Envelope {
    pub fn success(text: impl Into<String>) -> Self {
        Envelope::Success(text.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error(message.into())
    }

    /// Error envelope of the form `<context>: <cause>`.
    pub fn failure(context: &str, cause: impl Display) -> Self {
        Envelope::Error(format!("{}: {}", context, cause))
    }

    pub fn text(&self) -> &str {
        match self {
            Envelope::Success(text) | Envelope::Error(text) => text,
        }
    }
}

impl From<Envelope> for CallToolResult {
    fn from(envelope: Envelope) -> Self {
        match envelope {
            Envelope::Success(text) => CallToolResult::success(vec![Content::text(text)]),
            Envelope::Error(message) => CallToolResult::error(vec![Content::text(message)]),
        }
    }
}
