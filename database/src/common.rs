use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Row};
use taskboard_core::{
    error::{Result, TaskError},
    models::Task,
};

/// Convert a PostgreSQL row to the Task model
pub fn row_to_task(row: &PgRow) -> Result<Task> {
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(sqlx_error_to_task_error)?;

    Ok(Task {
        id: row.try_get("id").map_err(sqlx_error_to_task_error)?,
        title: row.try_get("title").map_err(sqlx_error_to_task_error)?,
        done: row.try_get("done").map_err(sqlx_error_to_task_error)?,
        created_at,
    })
}

/// Convert SQLx error to TaskError
pub fn sqlx_error_to_task_error(err: sqlx::Error) -> TaskError {
    match &err {
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => TaskError::Database(format!("{} (SQLSTATE {code})", db_err.message())),
            None => TaskError::Database(db_err.message().to_string()),
        },
        sqlx::Error::RowNotFound => {
            // Callers use fetch_optional and report NotFound themselves
            TaskError::Database("Unexpected RowNotFound error".to_string())
        }
        sqlx::Error::PoolTimedOut => TaskError::Database("Connection pool timeout".to_string()),
        sqlx::Error::PoolClosed => TaskError::Database("Connection pool closed".to_string()),
        sqlx::Error::Io(io_err) => TaskError::Database(format!("Database I/O error: {io_err}")),
        sqlx::Error::ColumnNotFound(column) => {
            TaskError::Database(format!("Missing column in result set: {column}"))
        }
        _ => TaskError::Database(format!("Database operation failed: {err}")),
    }
}
