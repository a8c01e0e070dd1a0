//! Standard test fixtures for consistent testing

use chrono::{Duration, TimeZone, Utc};
use taskboard_core::{NewTask, Task, UpdateTask, SEED_TASK_TITLES};

/// The five seed tasks as a freshly initialized store holds them
pub fn seed_tasks() -> Vec<Task> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    SEED_TASK_TITLES
        .iter()
        .zip(1..)
        .map(|(title, id)| Task {
            id,
            title: title.to_string(),
            done: false,
            created_at: base + Duration::milliseconds(i64::from(id)),
        })
        .collect()
}

/// Create a basic test task with sensible defaults
pub fn create_test_task() -> Task {
    Task {
        id: 1,
        title: "Test Task".to_string(),
        done: false,
        created_at: Utc::now(),
    }
}

/// Create a completed test task with the given ID
pub fn create_done_task(id: i32) -> Task {
    Task {
        id,
        title: format!("Done Task {id}"),
        done: true,
        created_at: Utc::now(),
    }
}

/// Create a new-task payload with a unique-ish title
pub fn create_new_task() -> NewTask {
    NewTask::new(format!("Fixture task {}", Utc::now().timestamp_nanos_opt().unwrap_or_default()))
}

/// Create an update that marks the task done under a new title
pub fn create_completing_update(title: &str) -> UpdateTask {
    UpdateTask::new(title, true)
}
