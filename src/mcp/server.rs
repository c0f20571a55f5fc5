//! MCP server implementation
//!
//! The server advertises the todo tool catalogue and routes `tools/call`
//! requests to [`TodoTools`]. Every call resolves to a tool result, so a bad
//! request never tears down the session with a JSON-RPC fault.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolCallContext,
    model::{
        CallToolRequestParams, CallToolResult, ListToolsResult, PaginatedRequestParams,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
};
use tracing::debug;

use crate::db::Database;
use crate::service::TodoService;

use super::envelope::Envelope;
use super::tools::TodoTools;

const INSTRUCTIONS: &str = "Todo list server. Create, update, complete, delete, list and \
search todos. Todo IDs are UUIDs and dates use the YYYY-MM-DD format.";

/// MCP server for one session.
///
/// Cheap to clone: the gateway builds a fresh handler per SSE session from a
/// shared template.
pub struct McpServer<D: Database> {
    tools: TodoTools<D>,
}

impl<D: Database> Clone for McpServer<D> {
    fn clone(&self) -> Self {
        Self {
            tools: self.tools.clone(),
        }
    }
}

impl<D: Database + 'static> McpServer<D> {
    pub fn new(service: TodoService<D>) -> Self {
        Self {
            tools: TodoTools::new(service),
        }
    }
}

/// Collapse a router outcome into a tool result.
///
/// Argument decoding failures surface from the router as `Err`; they are
/// reported to the client as error envelopes instead.
fn settle(outcome: Result<CallToolResult, McpError>) -> CallToolResult {
    match outcome {
        Ok(result) => result,
        Err(e) => Envelope::error(e.message.into_owned()).into(),
    }
}

impl<D: Database + 'static> ServerHandler for McpServer<D> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools.router().list_all()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "Tool call");

        if !self.tools.router().has_route(&request.name) {
            return Ok(Envelope::error(format!("Unknown tool: {}", request.name)).into());
        }

        let context = ToolCallContext::new(&self.tools, request, context);
        Ok(settle(self.tools.router().call(context).await))
    }
}
