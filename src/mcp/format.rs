//! Markdown rendering of todos for tool responses.

use crate::db::Todo;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render one todo as a markdown block.
pub fn format_todo(todo: &Todo) -> String {
    let status = if todo.completed {
        "✅ Completed"
    } else {
        "⏳ Pending"
    };

    format!(
        "## {} {}\n\nID: {}\nCreated: {}\nUpdated: {}\n\n{}",
        todo.title,
        status,
        todo.id,
        todo.created_at.format(TIMESTAMP_FORMAT),
        todo.updated_at.format(TIMESTAMP_FORMAT),
        todo.description
    )
}

/// Render a list of todos with a count header.
pub fn format_todo_list(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No todos found.".to_string();
    }

    let noun = if todos.len() == 1 { "item" } else { "items" };
    let blocks: Vec<String> = todos.iter().map(format_todo).collect();

    format!(
        "# Todo List ({} {})\n\n{}",
        todos.len(),
        noun,
        blocks.join("\n\n---\n\n")
    )
}
