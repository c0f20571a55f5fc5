//! MCP (Model Context Protocol) layer
//!
//! Exposes the todo service as ten MCP tools. Transport is handled by the
//! gateway; this module only knows about requests and results.

pub mod envelope;
pub mod format;
mod server;
pub mod tools;


pub use envelope::Envelope;
pub use format::{format_todo, format_todo_list};
pub use server::McpServer;
pub use tools::TodoTools;
