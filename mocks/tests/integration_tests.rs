use mocks::{seed_tasks, test_repository_contract, MockTaskRepository};
use std::collections::HashSet;
use taskboard_core::{NewTask, TaskError, TaskRepository, UpdateTask};

#[tokio::test]
async fn test_seeded_repository_lists_seed_tasks() {
    let repo = MockTaskRepository::seeded();
    let tasks = repo.list().await.unwrap();
    assert_eq!(tasks, seed_tasks());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_unique_ids() {
    let repo = MockTaskRepository::new();

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.create(NewTask::new(format!("task {i}"))).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let task = handle.await.unwrap().unwrap();
        assert!(ids.insert(task.id), "duplicate id {}", task.id);
    }

    assert_eq!(ids.len(), 32);
    let listed: Vec<i32> = repo.list().await.unwrap().iter().map(|t| t.id).collect();
    assert!(listed.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_injected_error_leaves_store_unchanged() {
    let repo = MockTaskRepository::seeded();
    repo.inject_error(TaskError::Database("deadlock detected".to_string()));

    let result = repo.update(1, UpdateTask::new("Changed", true)).await;
    assert!(matches!(result, Err(TaskError::Database(_))));
    assert_eq!(repo.get(1).unwrap(), seed_tasks()[0]);
}

#[tokio::test]
async fn test_contract_survives_many_rounds() {
    let repo = MockTaskRepository::seeded();
    for _ in 0..3 {
        test_repository_contract(&repo).await;
    }
}
