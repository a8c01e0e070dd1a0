use async_trait::async_trait;
use crate::{
    error::Result,
    models::{NewTask, Task, UpdateTask},
};

/// Repository trait for task persistence and retrieval operations
///
/// Every operation is a single round trip to the store. Implementations must
/// be thread-safe and hold no task state of their own between calls.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List every task
    ///
    /// # Returns
    /// * `Ok(Vec<Task>)` - All tasks ordered by ascending ID (may be empty)
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn list(&self) -> Result<Vec<Task>>;

    /// Create a new task
    ///
    /// # Arguments
    /// * `task` - The new task data to create
    ///
    /// # Returns
    /// * `Ok(Task)` - The created task with assigned ID and creation timestamp
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Replace the title and completion flag of an existing task
    ///
    /// # Arguments
    /// * `id` - The task ID to update
    /// * `update` - The new title and completion flag
    ///
    /// # Returns
    /// * `Ok(Task)` - The updated task
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist (nothing is created)
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn update(&self, id: i32, update: UpdateTask) -> Result<Task>;

    /// Permanently delete a task
    ///
    /// # Arguments
    /// * `id` - The task ID to delete
    ///
    /// # Returns
    /// * `Ok(())` - Exactly one task was removed
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn delete(&self, id: i32) -> Result<()>;
}
