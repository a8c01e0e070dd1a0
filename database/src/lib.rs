//! Database crate for the TaskBoard service
//!
//! PostgreSQL persistence for tasks, plus the startup plumbing around it.
//!
//! - [`connection`] - Connection parameters (secret file resolution) and the connection factory
//! - [`readiness`] - Startup gate that waits for the database to accept connections
//! - [`schema`] - Idempotent table creation and one-time seeding
//! - [`PostgresTaskRepository`] - The `TaskRepository` implementation
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::{ConnectionParams, PostgresTaskRepository, ReadinessGate};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = ConnectionParams::with_password_file(
//!         "postgres",
//!         5432,
//!         "taskboard",
//!         "taskboard",
//!         Path::new("/run/secrets/postgres_password"),
//!     )?;
//!
//!     ReadinessGate::default().wait(&params).await?;
//!
//!     let repo = PostgresTaskRepository::connect(&params, 5).await?;
//!     let report = repo.initialize_schema().await?;
//!     println!("{} tasks", report.task_count);
//!
//!     Ok(())
//! }
//! ```

mod common;
pub mod connection;
mod postgres;
pub mod readiness;
pub mod schema;

pub use connection::{read_secret, ConnectionParams};
pub use postgres::PostgresTaskRepository;
pub use readiness::ReadinessGate;
pub use schema::SchemaReport;

// Re-export commonly used types from taskboard-core for convenience
pub use taskboard_core::{
    error::{Result, TaskError},
    models::{NewTask, Task, UpdateTask},
    repository::TaskRepository,
};
