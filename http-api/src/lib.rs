//! TaskBoard HTTP API
//!
//! REST surface over a [`TaskRepository`](taskboard_core::TaskRepository):
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/health` | 200 `{"status":"ok"}` |
//! | GET | `/tasks` | 200, tasks by ascending id |
//! | POST | `/tasks` | 201, created task |
//! | PUT | `/tasks/{id}` | 200, updated task |
//! | DELETE | `/tasks/{id}` | 204 |
//!
//! Missing tasks are 404, malformed bodies and blank titles 422, storage
//! failures 500.
//!
//! # Usage
//!
//! ```no_run
//! use taskboard_api::TaskBoardServer;
//! use std::sync::Arc;
//!
//! async fn start_server() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     // In real usage, you would use database::PostgresTaskRepository
//!     let repository = Arc::new(mocks::MockTaskRepository::seeded());
//!     let server = TaskBoardServer::new(repository);
//!     server.serve("0.0.0.0:8000").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod request_logger;
pub mod server;

pub use error::ApiError;
pub use server::{create_router, AppState, TaskBoardServer};

// Re-export core types for external consumers
pub use taskboard_core::{NewTask, Task, TaskRepository, UpdateTask};
