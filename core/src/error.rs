use thiserror::Error;

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Error types for the TaskBoard service.
///
/// `Configuration` and `Startup` only occur while the process is coming up
/// and are fatal. The remaining variants are produced per request and map to
/// HTTP status codes through [`TaskError::status_code`].
///
/// # Examples
///
/// ```rust
/// use taskboard_core::error::TaskError;
///
/// let not_found = TaskError::not_found_id(42);
/// assert!(not_found.is_not_found());
/// assert_eq!(not_found.status_code(), 404);
///
/// let blank = TaskError::empty_field("title");
/// assert_eq!(blank.status_code(), 422);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task not found by the given identifier
    #[error("Task not found: {0}")]
    NotFound(String),

    /// Request data failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store did not become reachable during startup
    #[error("Startup error: {0}")]
    Startup(String),
}

impl TaskError {
    /// Create a not found error for a task ID
    pub fn not_found_id(id: i32) -> Self {
        Self::NotFound(format!("Task with ID {id} not found"))
    }

    /// Create a validation error for empty field
    pub fn empty_field(field: &str) -> Self {
        Self::Validation(format!("Field '{field}' cannot be empty"))
    }

    /// Check if this error indicates a not found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound(_))
    }

    /// Check if this error indicates a validation problem
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }

    /// Check if this error indicates a database problem
    pub fn is_database(&self) -> bool {
        matches!(self, TaskError::Database(_))
    }

    /// Check if this error can only happen before the server starts serving
    pub fn is_fatal(&self) -> bool {
        matches!(self, TaskError::Configuration(_) | TaskError::Startup(_))
    }

    /// Convert to appropriate HTTP status code equivalent
    pub fn status_code(&self) -> u16 {
        match self {
            TaskError::NotFound(_) => 404,
            TaskError::Validation(_) => 422,
            TaskError::Database(_) => 500,
            TaskError::Configuration(_) => 500,
            TaskError::Startup(_) => 503,
        }
    }
}
