//! Tests for TodoService.

use crate::db::{Database, SqliteDatabase};
use crate::service::{ServiceError, TodoService};

async fn setup_service() -> TodoService<SqliteDatabase> {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    TodoService::new(db)
}

#[tokio::test(flavor = "multi_thread")]
async fn create_then_get_returns_matching_todo() {
    let service = setup_service().await;

    let created = service
        .create("Buy milk", "2%")
        .await
        .expect("Create should succeed");
    let fetched = service
        .get(&created.id)
        .await
        .unwrap()
        .expect("Todo should exist");

    assert_eq!(fetched.title, "Buy milk");
    assert_eq!(fetched.description, "2%");
    assert!(!fetched.completed);
    assert_eq!(fetched.created_at, fetched.updated_at);
    assert_eq!(fetched, created);
}

#[tokio::test(flavor = "multi_thread")]
async fn create_assigns_unique_uuid_ids() {
    let service = setup_service().await;

    let a = service.create("A", "first").await.unwrap();
    let b = service.create("B", "second").await.unwrap();

    assert_ne!(a.id, b.id);
    assert!(uuid::Uuid::parse_str(&a.id).is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn create_trims_and_rejects_blank_fields() {
    let service = setup_service().await;

    let trimmed = service.create("  Padded  ", "\tdesc\n").await.unwrap();
    assert_eq!(trimmed.title, "Padded");
    assert_eq!(trimmed.description, "desc");

    let blank_title = service.create("   ", "desc").await;
    assert!(matches!(
        blank_title,
        Err(ServiceError::Validation { ref message }) if message == "Title is required"
    ));

    let blank_description = service.create("Title", "").await;
    assert!(matches!(
        blank_description,
        Err(ServiceError::Validation { ref message }) if message == "Description is required"
    ));

    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_missing_returns_none() {
    let service = setup_service().await;

    let result = service
        .get("00000000-0000-4000-8000-000000000000")
        .await
        .expect("Get should not error");

    assert!(result.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn update_without_fields_is_validation_error() {
    let service = setup_service().await;
    let todo = service.create("Title", "Description").await.unwrap();

    let result = service.update(&todo.id, None, None).await;

    assert!(matches!(result, Err(ServiceError::Validation { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_with_blank_field_is_validation_error() {
    let service = setup_service().await;
    let todo = service.create("Title", "Description").await.unwrap();

    let result = service.update(&todo.id, Some("  "), None).await;

    assert!(matches!(result, Err(ServiceError::Validation { .. })));
    let unchanged = service.get(&todo.id).await.unwrap().unwrap();
    assert_eq!(unchanged, todo);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_changes_only_provided_fields() {
    let service = setup_service().await;
    let todo = service.create("Title", "Description").await.unwrap();

    let updated = service
        .update(&todo.id, Some("New title"), None)
        .await
        .unwrap()
        .expect("Todo should exist");

    assert_eq!(updated.title, "New title");
    assert_eq!(updated.description, "Description");
    assert_eq!(updated.created_at, todo.created_at);
    assert!(updated.updated_at > todo.updated_at);

    let again = service
        .update(&todo.id, None, Some("New description"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(again.title, "New title");
    assert_eq!(again.description, "New description");
    assert!(again.updated_at > updated.updated_at);

    let stored = service.get(&todo.id).await.unwrap().unwrap();
    assert_eq!(stored, again);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_missing_returns_none() {
    let service = setup_service().await;

    let result = service
        .update("00000000-0000-4000-8000-000000000000", Some("x"), None)
        .await
        .expect("Update should not error");

    assert!(result.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_is_idempotent() {
    let service = setup_service().await;
    let todo = service.create("Finish report", "Q3 numbers").await.unwrap();

    let first = service.complete(&todo.id).await.unwrap().unwrap();
    assert!(first.completed);
    assert!(first.updated_at > todo.updated_at);

    let second = service.complete(&todo.id).await.unwrap().unwrap();
    assert!(second.completed);
    assert!(second.updated_at > first.updated_at);
    assert!(second.updated_at >= second.created_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn complete_missing_returns_none() {
    let service = setup_service().await;

    let result = service
        .complete("00000000-0000-4000-8000-000000000000")
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_missing_is_not_an_error() {
    let service = setup_service().await;
    let todo = service.create("Temp", "Remove me").await.unwrap();

    assert!(service.delete(&todo.id).await.unwrap());
    assert!(!service.delete(&todo.id).await.unwrap());
    assert!(service.get(&todo.id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn list_active_excludes_completed() {
    let service = setup_service().await;
    let a = service.create("A", "a").await.unwrap();
    let b = service.create("B", "b").await.unwrap();
    let c = service.create("C", "c").await.unwrap();
    service.complete(&b.id).await.unwrap();

    let all: Vec<String> = service.list().await.unwrap().into_iter().map(|t| t.id).collect();
    let active: Vec<String> = service
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();

    assert_eq!(all, vec![a.id.clone(), b.id, c.id.clone()]);
    assert_eq!(active, vec![a.id, c.id]);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_by_title_matches_case_insensitively_in_order() {
    let service = setup_service().await;
    let titles = ["Xylophone lesson", "buy milk", "EXTRA box", "Relax", "nothing"];
    for title in titles {
        service.create(title, "desc").await.unwrap();
    }

    let found: Vec<String> = service
        .search_by_title("x")
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();

    let expected: Vec<String> = titles
        .iter()
        .filter(|t| t.to_lowercase().contains('x'))
        .map(|t| t.to_string())
        .collect();
    assert_eq!(found, expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_by_date_matches_creation_day() {
    let service = setup_service().await;
    let todo = service.create("Today", "created now").await.unwrap();

    let today = todo.created_at.date_naive();
    let found = service.search_by_date(today).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, todo.id);

    let other_day = today.pred_opt().unwrap();
    assert!(service.search_by_date(other_day).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn summarize_active_lists_count_and_titles() {
    let service = setup_service().await;

    assert_eq!(
        service.summarize_active().await.unwrap(),
        "No active todos found."
    );

    service.create("Buy milk", "2%").await.unwrap();
    let done = service.create("Pay rent", "Before the 1st").await.unwrap();
    service.create("Call mom", "Sunday").await.unwrap();
    service.complete(&done.id).await.unwrap();

    let summary = service.summarize_active().await.unwrap();

    assert_eq!(
        summary,
        "# Active Todos Summary\n\nThere are 2 active todos.\n\n1. Buy milk\n2. Call mom"
    );
    assert!(!summary.contains("Before the 1st"), "Summary is not a full dump");
}

#[tokio::test(flavor = "multi_thread")]
async fn summarize_single_active_todo_uses_singular() {
    let service = setup_service().await;
    service.create("Only one", "desc").await.unwrap();

    let summary = service.summarize_active().await.unwrap();

    assert!(summary.contains("There is 1 active todo."));
    assert!(summary.contains("1. Only one"));
}
