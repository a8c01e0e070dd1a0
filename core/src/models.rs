use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Titles inserted, in order, when the task table is found empty at startup.
pub const SEED_TASK_TITLES: [&str; 5] = [
    "Learn Docker Swarm basics",
    "Add secrets + seeded DB",
    "Test scaling and VIP load balancing",
    "Practice rolling updates",
    "Write a CV-ready README",
];

/// A persisted task.
///
/// `id` and `created_at` are assigned by the store on insert and never change
/// afterwards; only `title` and `done` are mutable.
///
/// # Examples
///
/// ```rust
/// use taskboard_core::models::Task;
/// use chrono::Utc;
///
/// let task = Task {
///     id: 6,
///     title: "Write release notes".to_string(),
///     done: false,
///     created_at: Utc::now(),
/// };
///
/// let json = serde_json::to_value(&task).unwrap();
/// assert_eq!(json["id"], 6);
/// assert_eq!(json["done"], false);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Auto-increment primary key
    pub id: i32,
    /// Task title
    pub title: String,
    /// Completion flag
    pub done: bool,
    /// Creation timestamp, serialized as RFC 3339
    pub created_at: DateTime<Utc>,
}

/// Data transfer object for creating new tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTask {
    /// Task title
    pub title: String,
    /// Completion flag, `false` when omitted
    #[serde(default)]
    pub done: bool,
}

impl NewTask {
    /// Create a not-yet-done task with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            done: false,
        }
    }
}

/// Data transfer object for updating existing tasks
///
/// Updates are full replacements of the mutable fields: an omitted `done`
/// resets the task to not done.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateTask {
    /// New title
    pub title: String,
    /// New completion flag, `false` when omitted
    #[serde(default)]
    pub done: bool,
}

impl UpdateTask {
    pub fn new(title: impl Into<String>, done: bool) -> Self {
        Self {
            title: title.into(),
            done,
        }
    }
}

impl From<NewTask> for UpdateTask {
    fn from(task: NewTask) -> Self {
        Self {
            title: task.title,
            done: task.done,
        }
    }
}
