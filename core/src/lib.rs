//! TaskBoard Core Library
//!
//! Domain model, error taxonomy and the repository interface shared by every
//! other crate in the workspace.
//!
//! - [`models`] - `Task` and its input DTOs
//! - [`error`] - Error types and result handling
//! - [`repository`] - Repository trait for data persistence
//! - [`validation`] - Input validation applied before persistence
//!
//! # Example
//!
//! ```rust
//! use taskboard_core::{models::NewTask, validation::TaskValidator};
//!
//! let new_task = NewTask::new("Practice rolling updates");
//! TaskValidator::validate_new_task(&new_task).unwrap();
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod validation;

pub use error::{Result, TaskError};
pub use models::{NewTask, Task, UpdateTask, SEED_TASK_TITLES};
pub use repository::TaskRepository;
pub use validation::TaskValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
