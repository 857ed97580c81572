//! End-to-end flows through the async store, exercising the same
//! action sequences the TUI dispatches.

#![allow(clippy::unwrap_used)] // Test code can use unwrap

use std::sync::Arc;

use tido::{Filter, TodoAction, TodoEnvironment, TodoReducer, TodoState, TodoStore};
use tido_runtime::Store;
use tido_testing::test_clock;

fn test_store() -> TodoStore {
    Store::new(
        TodoState::new(),
        TodoReducer::new(),
        TodoEnvironment::new(Arc::new(test_clock())),
    )
}

#[tokio::test]
async fn add_toggle_and_filter_views() {
    let store = test_store();

    store
        .send(TodoAction::Add {
            text: "buy milk".to_string(),
        })
        .await
        .unwrap();
    store
        .send(TodoAction::Add {
            text: "walk dog".to_string(),
        })
        .await
        .unwrap();

    let first_id = store.state(|s| s.todos[0].id).await;
    store.send(TodoAction::Toggle { id: first_id }).await.unwrap();

    let state = store.state(Clone::clone).await;
    let active: Vec<String> = state
        .todos(Filter::Active)
        .map(|t| t.text.clone())
        .collect();
    let completed: Vec<String> = state
        .todos(Filter::Completed)
        .map(|t| t.text.clone())
        .collect();

    assert_eq!(active, ["walk dog"]);
    assert_eq!(completed, ["buy milk"]);
    assert_eq!(state.active_count(), 1);
}

#[tokio::test]
async fn mark_all_then_clear_empties_the_store() {
    let store = test_store();

    for text in ["a", "b"] {
        store
            .send(TodoAction::Add {
                text: text.to_string(),
            })
            .await
            .unwrap();
    }
    store.send(TodoAction::MarkAllCompleted).await.unwrap();
    assert_eq!(store.state(TodoState::active_count).await, 0);

    store.send(TodoAction::ClearCompleted).await.unwrap();
    assert!(store.state(TodoState::is_empty).await);
}

#[tokio::test]
async fn empty_and_whitespace_adds_are_ignored() {
    let store = test_store();

    for text in ["", "   ", "\t"] {
        store
            .send(TodoAction::Add {
                text: text.to_string(),
            })
            .await
            .unwrap();
    }

    assert!(store.state(TodoState::is_empty).await);
}

#[tokio::test]
async fn set_filter_changes_only_the_view() {
    let store = test_store();

    store
        .send(TodoAction::Add {
            text: "a".to_string(),
        })
        .await
        .unwrap();
    store
        .send(TodoAction::SetFilter {
            filter: Filter::Completed,
        })
        .await
        .unwrap();

    let state = store.state(Clone::clone).await;
    assert_eq!(state.filter, Filter::Completed);
    assert_eq!(state.visible().count(), 0);
    assert_eq!(state.len(), 1);
}

#[tokio::test]
async fn ids_keep_increasing_across_deletions() {
    let store = test_store();

    store
        .send(TodoAction::Add {
            text: "a".to_string(),
        })
        .await
        .unwrap();
    let first_id = store.state(|s| s.todos[0].id).await;

    store.send(TodoAction::MarkAllCompleted).await.unwrap();
    store.send(TodoAction::ClearCompleted).await.unwrap();
    store
        .send(TodoAction::Add {
            text: "b".to_string(),
        })
        .await
        .unwrap();

    let second_id = store.state(|s| s.todos[0].id).await;
    assert!(second_id > first_id);
}
