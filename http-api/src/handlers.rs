//! Route handlers. Each performs at most one repository call.

use crate::{
    error::ApiError,
    extract::{JsonBody, TaskId},
    server::AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use taskboard_core::{NewTask, Task, TaskRepository, TaskValidator, UpdateTask};

/// `GET /health`; never touches the store
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /tasks`
pub async fn list_tasks<R: TaskRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.repository.list().await?;
    Ok(Json(tasks))
}

/// `POST /tasks`
pub async fn create_task<R: TaskRepository>(
    State(state): State<AppState<R>>,
    JsonBody(new_task): JsonBody<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    TaskValidator::validate_new_task(&new_task)?;

    let task = state.repository.create(new_task).await?;
    tracing::info!(task_id = task.id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `PUT /tasks/{id}`
pub async fn update_task<R: TaskRepository>(
    State(state): State<AppState<R>>,
    TaskId(id): TaskId,
    JsonBody(update): JsonBody<UpdateTask>,
) -> Result<Json<Task>, ApiError> {
    TaskValidator::validate_update_task(&update)?;

    let task = state.repository.update(id, update).await?;
    tracing::info!(task_id = task.id, done = task.done, "Task updated");
    Ok(Json(task))
}

/// `DELETE /tasks/{id}`
pub async fn delete_task<R: TaskRepository>(
    State(state): State<AppState<R>>,
    TaskId(id): TaskId,
) -> Result<StatusCode, ApiError> {
    state.repository.delete(id).await?;
    tracing::info!(task_id = id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}
