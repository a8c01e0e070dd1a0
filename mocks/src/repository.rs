//! Mock implementation of TaskRepository trait
//!
//! Provides a thread-safe in-memory repository with:
//! - Error injection capabilities
//! - Call tracking for verification
//! - The same ordering and not-found semantics as the PostgreSQL repository

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicI32, Ordering},
    Arc,
};
use taskboard_core::{NewTask, Result, Task, TaskError, TaskRepository, UpdateTask};

/// Mock implementation of TaskRepository for testing
///
/// Tasks are kept in a `BTreeMap` keyed by ID so listing is naturally in
/// ascending ID order. IDs are never reused after a delete.
#[derive(Clone)]
pub struct MockTaskRepository {
    tasks: Arc<Mutex<BTreeMap<i32, Task>>>,
    next_id: Arc<AtomicI32>,
    error_injection: Arc<Mutex<Option<TaskError>>>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    /// Create mock repository with pre-populated tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let max_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let task_map = tasks.into_iter().map(|t| (t.id, t)).collect();

        Self {
            tasks: Arc::new(Mutex::new(task_map)),
            next_id: Arc::new(AtomicI32::new(max_id + 1)),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create mock repository holding the five seed tasks, IDs 1 to 5
    pub fn seeded() -> Self {
        Self::with_tasks(crate::fixtures::seed_tasks())
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: TaskError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Clear error injection
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
    }

    /// Get history of called methods
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Clear call history
    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }

    /// Assert method was called
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.starts_with(method)),
            "Method '{}' was not called. Call history: {:?}",
            method,
            *history
        );
    }

    /// Number of stored tasks
    pub fn task_count(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Snapshot of a stored task, bypassing call tracking
    pub fn get(&self, id: i32) -> Option<Task> {
        self.tasks.lock().get(&id).cloned()
    }

    /// Check if an error should be injected, consuming it if so
    fn check_error_injection(&self) -> Result<()> {
        match self.error_injection.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record_call(&self, method: &str) {
        self.call_history.lock().push(format!("{method}()"));
    }

    fn record_call_with_params(&self, method: &str, params: &str) {
        self.call_history.lock().push(format!("{method}({params})"));
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn list(&self) -> Result<Vec<Task>> {
        self.record_call("list");
        self.check_error_injection()?;

        Ok(self.tasks.lock().values().cloned().collect())
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        self.record_call_with_params("create", &format!("title={}", task.title));
        self.check_error_injection()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let new_task = Task {
            id,
            title: task.title,
            done: task.done,
            created_at: Utc::now(),
        };

        self.tasks.lock().insert(id, new_task.clone());
        Ok(new_task)
    }

    async fn update(&self, id: i32, update: UpdateTask) -> Result<Task> {
        self.record_call_with_params("update", &format!("id={id}"));
        self.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        let task = tasks.get_mut(&id).ok_or_else(|| TaskError::not_found_id(id))?;

        task.title = update.title;
        task.done = update.done;

        Ok(task.clone())
    }

    async fn delete(&self, id: i32) -> Result<()> {
        self.record_call_with_params("delete", &format!("id={id}"));
        self.check_error_injection()?;

        match self.tasks.lock().remove(&id) {
            Some(_) => Ok(()),
            None => Err(TaskError::not_found_id(id)),
        }
    }
}
