//! Idempotent schema creation and one-time seeding.

use crate::common::sqlx_error_to_task_error;
use sqlx::{PgPool, QueryBuilder};
use taskboard_core::{error::Result, models::SEED_TASK_TITLES};

/// Creates the task table when it does not exist yet
pub const CREATE_TASKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    done BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Advisory lock key serializing schema initialization across replicas
const SCHEMA_LOCK_KEY: i64 = 0x7461_736b_626f_6172;

/// Outcome of [`initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaReport {
    /// Whether the seed tasks were inserted by this run
    pub seeded: bool,
    /// Number of tasks present once initialization finished
    pub task_count: i64,
}

/// Ensure the task table exists and seed it if it is empty.
///
/// Safe to run on every startup: the table is only created when missing and
/// seed rows are only inserted into an empty table. Everything runs in one
/// transaction holding an advisory lock, so replicas starting together
/// cannot seed twice.
pub async fn initialize(pool: &PgPool) -> Result<SchemaReport> {
    let mut tx = pool.begin().await.map_err(sqlx_error_to_task_error)?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(sqlx_error_to_task_error)?;

    sqlx::query(CREATE_TASKS_TABLE)
        .execute(&mut *tx)
        .await
        .map_err(sqlx_error_to_task_error)?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
        .fetch_one(&mut *tx)
        .await
        .map_err(sqlx_error_to_task_error)?;

    let report = if existing == 0 {
        let mut query_builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("INSERT INTO tasks (title, done) ");
        query_builder.push_values(SEED_TASK_TITLES, |mut row, title| {
            row.push_bind(title).push_bind(false);
        });
        let inserted = query_builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(sqlx_error_to_task_error)?
            .rows_affected();

        SchemaReport {
            seeded: true,
            task_count: inserted as i64,
        }
    } else {
        SchemaReport {
            seeded: false,
            task_count: existing,
        }
    };

    tx.commit().await.map_err(sqlx_error_to_task_error)?;

    tracing::info!(
        seeded = report.seeded,
        task_count = report.task_count,
        "Database schema initialized"
    );
    Ok(report)
}
