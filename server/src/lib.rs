//! TaskBoard server library
//!
//! Configuration loading, logging setup and startup wiring for the
//! `taskboard` binary.

pub mod config;
pub mod setup;
pub mod telemetry;

pub use config::Config;
pub use setup::{create_repository, create_server, exit_code_for, initialize_app, App};
pub use telemetry::init_telemetry;
