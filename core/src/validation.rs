use crate::{
    error::{Result, TaskError},
    models::{NewTask, UpdateTask},
};

/// Validation utilities applied at the HTTP boundary.
///
/// The store accepts any non-null title; blank titles are rejected here so
/// the repository stays a plain mapping onto SQL.
pub struct TaskValidator;

impl TaskValidator {
    /// Validate a task title
    ///
    /// Titles must contain at least one non-whitespace character.
    ///
    /// # Returns
    /// * `Ok(())` - If the title is valid
    /// * `Err(TaskError::Validation)` - If the title is blank
    pub fn validate_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(TaskError::empty_field("title"));
        }
        Ok(())
    }

    /// Validate a complete new task
    pub fn validate_new_task(task: &NewTask) -> Result<()> {
        Self::validate_title(&task.title)
    }

    /// Validate a complete task update
    pub fn validate_update_task(update: &UpdateTask) -> Result<()> {
        Self::validate_title(&update.title)
    }
}
