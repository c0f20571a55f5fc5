//! MCP tools for Todo management.

use rmcp::{
    ErrorData as McpError,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars,
    schemars::JsonSchema,
    tool, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::mcp::envelope::Envelope;
use crate::mcp::format::{format_todo, format_todo_list};
use crate::mcp::tools::{not_found, parse_date, parse_todo_id, service_failure};
use crate::service::TodoService;

// =============================================================================
// Parameter Structs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTodoParams {
    #[schemars(description = "Short title of the todo (required, non-empty)")]
    pub title: String,
    #[schemars(description = "What needs to be done (required, non-empty)")]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TodoIdParams {
    #[schemars(description = "Todo ID (UUID)")]
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTodoParams {
    #[schemars(description = "Todo ID (UUID) to update")]
    pub id: String,
    #[schemars(description = "New title (optional, non-empty when given)")]
    pub title: Option<String>,
    #[schemars(description = "New description (optional, non-empty when given)")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchByTitleParams {
    #[schemars(description = "Search term, matched case-insensitively anywhere in the title")]
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchByDateParams {
    #[schemars(description = "Creation date in YYYY-MM-DD format (UTC)")]
    pub date: String,
}

// =============================================================================
// Todo Tools
// =============================================================================

pub struct TodoTools<D: Database> {
    service: TodoService<D>,
    tool_router: ToolRouter<Self>,
}

impl<D: Database> Clone for TodoTools<D> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            tool_router: self.tool_router.clone(),
        }
    }
}

#[tool_router]
impl<D: Database + 'static> TodoTools<D> {
    pub fn new(service: TodoService<D>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    /// Get the tool router for this handler
    pub fn router(&self) -> &ToolRouter<Self> {
        &self.tool_router
    }

    #[tool(name = "create-todo", description = "Create a new todo item")]
    pub async fn create_todo(
        &self,
        params: Parameters<CreateTodoParams>,
    ) -> Result<CallToolResult, McpError> {
        const CONTEXT: &str = "Failed to create todo";

        match self
            .service
            .create(&params.0.title, &params.0.description)
            .await
        {
            Ok(todo) => Ok(Envelope::success(format!(
                "✅ Todo Created:\n\n{}",
                format_todo(&todo)
            ))
            .into()),
            Err(e) => Ok(service_failure(CONTEXT, e)),
        }
    }

    #[tool(name = "list-todos", description = "List all todos")]
    pub async fn list_todos(&self) -> Result<CallToolResult, McpError> {
        match self.service.list().await {
            Ok(todos) => Ok(Envelope::success(format_todo_list(&todos)).into()),
            Err(e) => Ok(service_failure("Failed to list todos", e)),
        }
    }

    #[tool(name = "get-todo", description = "Get a specific todo by ID")]
    pub async fn get_todo(
        &self,
        params: Parameters<TodoIdParams>,
    ) -> Result<CallToolResult, McpError> {
        const CONTEXT: &str = "Failed to get todo";

        let id = match parse_todo_id(&params.0.id) {
            Ok(id) => id,
            Err(invalid) => return Ok(Envelope::failure(CONTEXT, invalid.text()).into()),
        };

        match self.service.get(id).await {
            Ok(Some(todo)) => Ok(Envelope::success(format_todo(&todo)).into()),
            Ok(None) => Ok(not_found(CONTEXT, id)),
            Err(e) => Ok(service_failure(CONTEXT, e)),
        }
    }

    #[tool(
        name = "update-todo",
        description = "Update a todo title or description. At least one of the two must be provided."
    )]
    pub async fn update_todo(
        &self,
        params: Parameters<UpdateTodoParams>,
    ) -> Result<CallToolResult, McpError> {
        const CONTEXT: &str = "Failed to update todo";

        let id = match parse_todo_id(&params.0.id) {
            Ok(id) => id,
            Err(invalid) => return Ok(Envelope::failure(CONTEXT, invalid.text()).into()),
        };

        match self
            .service
            .update(
                id,
                params.0.title.as_deref(),
                params.0.description.as_deref(),
            )
            .await
        {
            Ok(Some(todo)) => Ok(Envelope::success(format!(
                "✅ Todo Updated:\n\n{}",
                format_todo(&todo)
            ))
            .into()),
            Ok(None) => Ok(not_found(CONTEXT, id)),
            Err(e) => Ok(service_failure(CONTEXT, e)),
        }
    }

    #[tool(name = "complete-todo", description = "Mark a todo as completed")]
    pub async fn complete_todo(
        &self,
        params: Parameters<TodoIdParams>,
    ) -> Result<CallToolResult, McpError> {
        const CONTEXT: &str = "Failed to complete todo";

        let id = match parse_todo_id(&params.0.id) {
            Ok(id) => id,
            Err(invalid) => return Ok(Envelope::failure(CONTEXT, invalid.text()).into()),
        };

        match self.service.complete(id).await {
            Ok(Some(todo)) => Ok(Envelope::success(format!(
                "✅ Todo Completed:\n\n{}",
                format_todo(&todo)
            ))
            .into()),
            Ok(None) => Ok(not_found(CONTEXT, id)),
            Err(e) => Ok(service_failure(CONTEXT, e)),
        }
    }

    #[tool(name = "delete-todo", description = "Delete a todo")]
    pub async fn delete_todo(
        &self,
        params: Parameters<TodoIdParams>,
    ) -> Result<CallToolResult, McpError> {
        const CONTEXT: &str = "Failed to delete todo";

        let id = match parse_todo_id(&params.0.id) {
            Ok(id) => id,
            Err(invalid) => return Ok(Envelope::failure(CONTEXT, invalid.text()).into()),
        };

        // Fetch first so the response can name what was deleted
        let todo = match self.service.get(id).await {
            Ok(Some(todo)) => todo,
            Ok(None) => return Ok(not_found(CONTEXT, id)),
            Err(e) => return Ok(service_failure(CONTEXT, e)),
        };

        match self.service.delete(id).await {
            Ok(true) => Ok(Envelope::success(format!("✅ Todo Deleted: \"{}\"", todo.title)).into()),
            Ok(false) => Ok(not_found(CONTEXT, id)),
            Err(e) => Ok(service_failure(CONTEXT, e)),
        }
    }

    #[tool(
        name = "search-todos-by-title",
        description = "Search todos by title (case insensitive partial match)"
    )]
    pub async fn search_todos_by_title(
        &self,
        params: Parameters<SearchByTitleParams>,
    ) -> Result<CallToolResult, McpError> {
        const CONTEXT: &str = "Failed to search todos";

        if params.0.title.is_empty() {
            return Ok(Envelope::failure(CONTEXT, "Search term is required").into());
        }

        match self.service.search_by_title(&params.0.title).await {
            Ok(todos) => Ok(Envelope::success(format_todo_list(&todos)).into()),
            Err(e) => Ok(service_failure(CONTEXT, e)),
        }
    }

    #[tool(
        name = "search-todos-by-date",
        description = "Search todos by creation date (format: YYYY-MM-DD)"
    )]
    pub async fn search_todos_by_date(
        &self,
        params: Parameters<SearchByDateParams>,
    ) -> Result<CallToolResult, McpError> {
        const CONTEXT: &str = "Failed to search todos by date";

        let date = match parse_date(&params.0.date) {
            Ok(date) => date,
            Err(invalid) => return Ok(Envelope::failure(CONTEXT, invalid.text()).into()),
        };

        match self.service.search_by_date(date).await {
            Ok(todos) => Ok(Envelope::success(format_todo_list(&todos)).into()),
            Err(e) => Ok(service_failure(CONTEXT, e)),
        }
    }

    #[tool(name = "list-active-todos", description = "List all non-completed todos")]
    pub async fn list_active_todos(&self) -> Result<CallToolResult, McpError> {
        match self.service.list_active().await {
            Ok(todos) => Ok(Envelope::success(format_todo_list(&todos)).into()),
            Err(e) => Ok(service_failure("Failed to list active todos", e)),
        }
    }

    #[tool(
        name = "summarize-active-todos",
        description = "Generate a summary of all active (non-completed) todos"
    )]
    pub async fn summarize_active_todos(&self) -> Result<CallToolResult, McpError> {
        match self.service.summarize_active().await {
            Ok(summary) => Ok(Envelope::success(summary).into()),
            Err(e) => Ok(service_failure("Failed to summarize active todos", e)),
        }
    }
}
