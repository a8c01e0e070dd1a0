use crate::{
    common::{row_to_task, sqlx_error_to_task_error},
    connection::ConnectionParams,
    schema::{self, SchemaReport},
};
use async_trait::async_trait;
use sqlx::{pool::PoolConnection, PgPool, Postgres};
use taskboard_core::{
    error::{Result, TaskError},
    models::{NewTask, Task, UpdateTask},
    repository::TaskRepository,
};

/// PostgreSQL implementation of the TaskRepository trait
///
/// Every operation acquires its own pooled connection and runs exactly one
/// auto-committed statement. The connection goes back to the pool when the
/// guard is dropped, on success and on error alike.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Connect a new repository using resolved connection parameters
    ///
    /// # Returns
    /// * `Ok(PostgresTaskRepository)` - Successfully connected repository
    /// * `Err(TaskError::Database)` - If connection fails
    pub async fn connect(params: &ConnectionParams, max_connections: u32) -> Result<Self> {
        let pool = params.create_pool(max_connections).await?;
        tracing::info!(
            database = %params,
            max_connections,
            "Connected task repository"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the task table if needed and seed an empty table
    pub async fn initialize_schema(&self) -> Result<SchemaReport> {
        schema::initialize(&self.pool).await
    }

    /// Get access to the underlying database pool for custom operations
    ///
    /// This method is primarily intended for testing scenarios where
    /// direct SQL execution is needed.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(sqlx_error_to_task_error)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list(&self) -> Result<Vec<Task>> {
        let mut conn = self.acquire().await?;

        let rows = sqlx::query("SELECT id, title, done, created_at FROM tasks ORDER BY id")
            .fetch_all(&mut *conn)
            .await
            .map_err(sqlx_error_to_task_error)?;

        tracing::debug!(count = rows.len(), "Listed tasks");
        rows.iter().map(row_to_task).collect()
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let mut conn = self.acquire().await?;

        let row = sqlx::query(
            "INSERT INTO tasks (title, done) VALUES ($1, $2) RETURNING id, title, done, created_at",
        )
        .bind(&task.title)
        .bind(task.done)
        .fetch_one(&mut *conn)
        .await
        .map_err(sqlx_error_to_task_error)?;

        let created = row_to_task(&row)?;
        tracing::debug!(task_id = created.id, "Created task");
        Ok(created)
    }

    async fn update(&self, id: i32, update: UpdateTask) -> Result<Task> {
        let mut conn = self.acquire().await?;

        let row = sqlx::query(
            "UPDATE tasks SET title = $1, done = $2 WHERE id = $3 RETURNING id, title, done, created_at",
        )
        .bind(&update.title)
        .bind(update.done)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(sqlx_error_to_task_error)?;

        match row {
            Some(row) => {
                tracing::debug!(task_id = id, done = update.done, "Updated task");
                row_to_task(&row)
            }
            None => Err(TaskError::not_found_id(id)),
        }
    }

    async fn delete(&self, id: i32) -> Result<()> {
        let mut conn = self.acquire().await?;

        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(sqlx_error_to_task_error)?;

        if result.rows_affected() == 0 {
            return Err(TaskError::not_found_id(id));
        }

        tracing::debug!(task_id = id, "Deleted task");
        Ok(())
    }
}
