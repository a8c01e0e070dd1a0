//! Mock implementations and test utilities for the TaskBoard service
//!
//! - An in-memory `TaskRepository` with error injection and call tracking
//! - Fixtures mirroring a freshly seeded store
//! - A contract suite every `TaskRepository` implementation must pass

pub mod contracts;
pub mod fixtures;
pub mod repository;

pub use contracts::*;
pub use fixtures::*;
pub use repository::MockTaskRepository;
