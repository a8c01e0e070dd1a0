//! Contract test helpers for validating TaskRepository implementations
//!
//! Every implementation, in-memory or PostgreSQL, must pass these. The
//! checks are relative to whatever the repository already holds, so they
//! run against empty and seeded stores alike.

use crate::fixtures::{create_completing_update, create_new_task};
use taskboard_core::{NewTask, TaskError, TaskRepository, UpdateTask};

/// Run the full contract suite against `repo`
pub async fn test_repository_contract<R: TaskRepository>(repo: &R) {
    test_create_contract(repo).await;
    test_list_contract(repo).await;
    test_update_contract(repo).await;
    test_update_missing_contract(repo).await;
    test_delete_contract(repo).await;
    test_delete_missing_contract(repo).await;
}

/// Created tasks get fresh, increasing IDs and non-decreasing timestamps
pub async fn test_create_contract<R: TaskRepository>(repo: &R) {
    let before = repo.list().await.expect("List should succeed");
    let max_before = before.iter().map(|t| t.id).max().unwrap_or(0);

    let first = repo
        .create(NewTask::new("Contract create one"))
        .await
        .expect("Create should succeed");
    let second = repo
        .create(NewTask {
            title: "Contract create two".to_string(),
            done: true,
        })
        .await
        .expect("Create should succeed");

    assert!(first.id > max_before, "IDs must exceed every existing ID");
    assert!(second.id > first.id, "IDs must increase across creates");
    assert!(
        second.created_at >= first.created_at,
        "created_at must be non-decreasing"
    );
    assert_eq!(first.title, "Contract create one");
    assert!(!first.done, "done defaults to false");
    assert!(second.done, "explicit done is preserved");
}

/// List is in ascending ID order after mixed operations
pub async fn test_list_contract<R: TaskRepository>(repo: &R) {
    let a = repo.create(create_new_task()).await.expect("Create should succeed");
    let b = repo.create(create_new_task()).await.expect("Create should succeed");
    let c = repo.create(create_new_task()).await.expect("Create should succeed");

    repo.update(a.id, UpdateTask::new("Touched last", true))
        .await
        .expect("Update should succeed");
    repo.delete(b.id).await.expect("Delete should succeed");

    let tasks = repo.list().await.expect("List should succeed");
    let ids: Vec<i32> = tasks.iter().map(|t| t.id).collect();

    assert!(
        ids.windows(2).all(|w| w[0] < w[1]),
        "List must be ordered by ascending ID, got {ids:?}"
    );
    assert!(ids.contains(&a.id));
    assert!(!ids.contains(&b.id));
    assert!(ids.contains(&c.id));
}

/// Update replaces title and done but keeps id and created_at
pub async fn test_update_contract<R: TaskRepository>(repo: &R) {
    let task = repo
        .create(NewTask::new("Before update"))
        .await
        .expect("Create should succeed");

    let updated = repo
        .update(task.id, create_completing_update("After update"))
        .await
        .expect("Update should succeed");

    assert_eq!(updated.id, task.id);
    assert_eq!(updated.title, "After update");
    assert!(updated.done);
    assert_eq!(updated.created_at, task.created_at, "created_at is immutable");

    let reverted = repo
        .update(task.id, UpdateTask::new("After update", false))
        .await
        .expect("Update should succeed");
    assert!(!reverted.done);
}

/// Updating a missing task is NotFound and creates nothing
pub async fn test_update_missing_contract<R: TaskRepository>(repo: &R) {
    let before = repo.list().await.expect("List should succeed").len();

    match repo.update(i32::MAX, UpdateTask::new("Ghost", true)).await {
        Err(TaskError::NotFound(_)) => {}
        other => panic!("Expected NotFound error, got: {other:?}"),
    }

    let after = repo.list().await.expect("List should succeed").len();
    assert_eq!(before, after, "Update must not upsert");
}

/// Deleting removes exactly one task
pub async fn test_delete_contract<R: TaskRepository>(repo: &R) {
    let task = repo.create(create_new_task()).await.expect("Create should succeed");
    let before = repo.list().await.expect("List should succeed").len();

    repo.delete(task.id).await.expect("Delete should succeed");

    let tasks = repo.list().await.expect("List should succeed");
    assert_eq!(tasks.len(), before - 1);
    assert!(tasks.iter().all(|t| t.id != task.id));

    match repo.delete(task.id).await {
        Err(TaskError::NotFound(_)) => {}
        other => panic!("Second delete should be NotFound, got: {other:?}"),
    }
}

/// Deleting a missing task is NotFound and leaves the store unchanged
pub async fn test_delete_missing_contract<R: TaskRepository>(repo: &R) {
    let before = repo.list().await.expect("List should succeed");

    match repo.delete(i32::MAX).await {
        Err(TaskError::NotFound(_)) => {}
        other => panic!("Expected NotFound error, got: {other:?}"),
    }

    let after = repo.list().await.expect("List should succeed");
    assert_eq!(before, after);
}
