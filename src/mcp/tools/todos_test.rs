//! Tests for Todo MCP tools

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, RawContent};

use crate::db::{Database, SqliteDatabase};
use crate::mcp::tools::todos::{
    CreateTodoParams, SearchByDateParams, SearchByTitleParams, TodoIdParams, TodoTools,
    UpdateTodoParams,
};
use crate::service::TodoService;

const MISSING_ID: &str = "0b8f5a0e-3d5c-4c1e-9a55-6f3f1d2f7a10";

async fn setup_tools() -> TodoTools<SqliteDatabase> {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    TodoTools::new(TodoService::new(db))
}

fn text_of(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(text) => text.text.as_str(),
        _ => panic!("Expected text content"),
    }
}

fn assert_ok(result: &CallToolResult) {
    assert_eq!(result.is_error, Some(false), "unexpected error: {}", text_of(result));
}

fn assert_err(result: &CallToolResult) {
    assert_eq!(result.is_error, Some(true), "unexpected success: {}", text_of(result));
}

/// Pull the `ID: <uuid>` line out of a rendered todo.
fn id_of(result: &CallToolResult) -> String {
    text_of(result)
        .lines()
        .find_map(|line| line.strip_prefix("ID: "))
        .expect("Rendered todo should contain an ID line")
        .to_string()
}

async fn create(tools: &TodoTools<SqliteDatabase>, title: &str, description: &str) -> String {
    let result = tools
        .create_todo(Parameters(CreateTodoParams {
            title: title.to_string(),
            description: description.to_string(),
        }))
        .await
        .expect("create_todo should not fault");
    assert_ok(&result);
    id_of(&result)
}

#[tokio::test(flavor = "multi_thread")]
async fn create_todo_renders_created_todo() {
    let tools = setup_tools().await;

    let result = tools
        .create_todo(Parameters(CreateTodoParams {
            title: "Buy milk".to_string(),
            description: "2% from the corner shop".to_string(),
        }))
        .await
        .unwrap();

    assert_ok(&result);
    let text = text_of(&result);
    assert!(text.starts_with("✅ Todo Created:\n\n## Buy milk ⏳ Pending"));
    assert!(text.ends_with("2% from the corner shop"));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_todo_rejects_blank_title() {
    let tools = setup_tools().await;

    let result = tools
        .create_todo(Parameters(CreateTodoParams {
            title: "   ".to_string(),
            description: "something".to_string(),
        }))
        .await
        .unwrap();

    assert_err(&result);
    assert_eq!(text_of(&result), "Failed to create todo: Title is required");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_todos_empty() {
    let tools = setup_tools().await;

    let result = tools.list_todos().await.unwrap();

    assert_ok(&result);
    assert_eq!(text_of(&result), "No todos found.");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_todos_counts_items() {
    let tools = setup_tools().await;
    create(&tools, "First", "one").await;
    create(&tools, "Second", "two").await;

    let result = tools.list_todos().await.unwrap();

    assert_ok(&result);
    let text = text_of(&result);
    assert!(text.starts_with("# Todo List (2 items)"));
    assert!(text.find("## First").unwrap() < text.find("## Second").unwrap());
    assert!(text.contains("\n\n---\n\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_todo_rejects_malformed_id() {
    let tools = setup_tools().await;

    let result = tools
        .get_todo(Parameters(TodoIdParams {
            id: "abc12345".to_string(),
        }))
        .await
        .unwrap();

    assert_err(&result);
    assert_eq!(text_of(&result), "Failed to get todo: Invalid Todo ID");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_todo_reports_missing() {
    let tools = setup_tools().await;

    let result = tools
        .get_todo(Parameters(TodoIdParams {
            id: MISSING_ID.to_string(),
        }))
        .await
        .unwrap();

    assert_err(&result);
    assert_eq!(
        text_of(&result),
        format!("Failed to get todo: Todo with ID {} not found", MISSING_ID)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn update_todo_changes_title_only() {
    let tools = setup_tools().await;
    let id = create(&tools, "Old", "keep me").await;

    let result = tools
        .update_todo(Parameters(UpdateTodoParams {
            id: id.clone(),
            title: Some("New".to_string()),
            description: None,
        }))
        .await
        .unwrap();

    assert_ok(&result);
    let text = text_of(&result);
    assert!(text.starts_with("✅ Todo Updated:\n\n## New ⏳ Pending"));
    assert!(text.ends_with("keep me"));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_todo_requires_a_field() {
    let tools = setup_tools().await;
    let id = create(&tools, "Title", "Body").await;

    let result = tools
        .update_todo(Parameters(UpdateTodoParams {
            id,
            title: None,
            description: None,
        }))
        .await
        .unwrap();

    assert_err(&result);
    assert_eq!(
        text_of(&result),
        "Failed to update todo: At least one field (title or description) must be provided"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn update_todo_reports_missing() {
    let tools = setup_tools().await;

    let result = tools
        .update_todo(Parameters(UpdateTodoParams {
            id: MISSING_ID.to_string(),
            title: Some("x".to_string()),
            description: None,
        }))
        .await
        .unwrap();

    assert_err(&result);
    assert!(text_of(&result).ends_with("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_todo_marks_completed() {
    let tools = setup_tools().await;
    let id = create(&tools, "Finish report", "Q3").await;

    let result = tools
        .complete_todo(Parameters(TodoIdParams { id: id.clone() }))
        .await
        .unwrap();

    assert_ok(&result);
    assert!(text_of(&result).starts_with("✅ Todo Completed:\n\n## Finish report ✅ Completed"));

    // Completing again is not an error
    let again = tools
        .complete_todo(Parameters(TodoIdParams { id }))
        .await
        .unwrap();
    assert_ok(&again);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_todo_names_deleted_title() {
    let tools = setup_tools().await;
    let id = create(&tools, "Temporary", "gone soon").await;

    let result = tools
        .delete_todo(Parameters(TodoIdParams { id: id.clone() }))
        .await
        .unwrap();

    assert_ok(&result);
    assert_eq!(text_of(&result), "✅ Todo Deleted: \"Temporary\"");

    let second = tools
        .delete_todo(Parameters(TodoIdParams { id: id.clone() }))
        .await
        .unwrap();
    assert_err(&second);
    assert_eq!(
        text_of(&second),
        format!("Failed to delete todo: Todo with ID {} not found", id)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn search_by_title_is_case_insensitive() {
    let tools = setup_tools().await;
    create(&tools, "Buy Milk", "dairy").await;
    create(&tools, "Walk dog", "park").await;

    let result = tools
        .search_todos_by_title(Parameters(SearchByTitleParams {
            title: "milk".to_string(),
        }))
        .await
        .unwrap();

    assert_ok(&result);
    let text = text_of(&result);
    assert!(text.starts_with("# Todo List (1 item)"));
    assert!(text.contains("## Buy Milk"));
    assert!(!text.contains("Walk dog"));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_by_title_requires_term() {
    let tools = setup_tools().await;

    let result = tools
        .search_todos_by_title(Parameters(SearchByTitleParams {
            title: String::new(),
        }))
        .await
        .unwrap();

    assert_err(&result);
    assert_eq!(text_of(&result), "Failed to search todos: Search term is required");
}

#[tokio::test(flavor = "multi_thread")]
async fn search_by_date_finds_todays_todos() {
    let tools = setup_tools().await;
    create(&tools, "Today", "now").await;
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();

    let result = tools
        .search_todos_by_date(Parameters(SearchByDateParams { date: today }))
        .await
        .unwrap();

    assert_ok(&result);
    assert!(text_of(&result).contains("## Today"));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_by_date_with_no_matches() {
    let tools = setup_tools().await;
    create(&tools, "Today", "now").await;

    let result = tools
        .search_todos_by_date(Parameters(SearchByDateParams {
            date: "1999-01-01".to_string(),
        }))
        .await
        .unwrap();

    assert_ok(&result);
    assert_eq!(text_of(&result), "No todos found.");
}

#[tokio::test(flavor = "multi_thread")]
async fn search_by_date_rejects_bad_format() {
    let tools = setup_tools().await;

    let result = tools
        .search_todos_by_date(Parameters(SearchByDateParams {
            date: "03/14/2025".to_string(),
        }))
        .await
        .unwrap();

    assert_err(&result);
    assert_eq!(
        text_of(&result),
        "Failed to search todos by date: Date must be in YYYY-MM-DD format"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn summarize_with_no_active_todos() {
    let tools = setup_tools().await;

    let result = tools.summarize_active_todos().await.unwrap();

    assert_ok(&result);
    assert_eq!(text_of(&result), "No active todos found.");
}

#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_create_complete_delete() {
    let tools = setup_tools().await;
    let done = create(&tools, "Done soon", "a").await;
    create(&tools, "Still open", "b").await;

    tools
        .complete_todo(Parameters(TodoIdParams { id: done.clone() }))
        .await
        .unwrap();

    let active = tools.list_active_todos().await.unwrap();
    assert_ok(&active);
    let text = text_of(&active);
    assert!(text.starts_with("# Todo List (1 item)"));
    assert!(text.contains("## Still open"));
    assert!(!text.contains("Done soon"));

    let summary = tools.summarize_active_todos().await.unwrap();
    assert_eq!(
        text_of(&summary),
        "# Active Todos Summary\n\nThere is 1 active todo.\n\n1. Still open"
    );

    let deleted = tools
        .delete_todo(Parameters(TodoIdParams { id: done.clone() }))
        .await
        .unwrap();
    assert_ok(&deleted);

    let fetched = tools
        .get_todo(Parameters(TodoIdParams { id: done }))
        .await
        .unwrap();
    assert_err(&fetched);
    assert!(text_of(&fetched).ends_with("not found"));
}
