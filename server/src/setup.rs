use anyhow::{Context, Result};
use database::{ConnectionParams, PostgresTaskRepository, ReadinessGate};
use std::sync::Arc;
use taskboard_api::TaskBoardServer;
use taskboard_core::TaskError;
use tracing::info;

use crate::config::Config;
use crate::telemetry::log_startup_info;

/// Exit code for invalid configuration or an unreadable secret
pub const EXIT_CONFIG: i32 = 1;
/// Exit code when the database never became ready or the schema could not be prepared
pub const EXIT_STARTUP: i32 = 2;
/// Exit code when the HTTP server cannot bind or fails while serving
pub const EXIT_SERVER: i32 = 3;

/// Map a startup failure to the process exit code
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<TaskError>() {
        Some(TaskError::Configuration(_)) => EXIT_CONFIG,
        _ => EXIT_STARTUP,
    }
}

/// Readiness gate configured from the database section
pub fn readiness_gate(config: &Config) -> ReadinessGate {
    ReadinessGate::new(
        config.startup_timeout(),
        config.retry_interval(),
        config.probe_timeout(),
    )
}

/// Block until the database accepts connections or the startup deadline passes
pub async fn wait_for_database(config: &Config, params: &ConnectionParams) -> Result<()> {
    info!(database = %params, "Waiting for database");

    readiness_gate(config)
        .wait(params)
        .await
        .context("Database did not become ready")
}

/// Create the task repository and prepare its schema
pub async fn create_repository(
    config: &Config,
    params: &ConnectionParams,
) -> Result<Arc<PostgresTaskRepository>> {
    info!("Creating task repository");

    let repo = PostgresTaskRepository::connect(params, config.database.max_connections)
        .await
        .context("Failed to create PostgreSQL connection pool")?;

    let report = repo
        .initialize_schema()
        .await
        .context("Failed to initialize database schema")?;

    info!(
        seeded = report.seeded,
        task_count = report.task_count,
        "Task repository ready"
    );
    Ok(Arc::new(repo))
}

/// Create the HTTP server over `repository`
pub fn create_server(repository: Arc<PostgresTaskRepository>) -> TaskBoardServer<PostgresTaskRepository> {
    info!("Creating HTTP server");
    TaskBoardServer::new(repository)
}

/// A fully initialized application, ready to serve
pub struct App {
    pub server: TaskBoardServer<PostgresTaskRepository>,
    pub repository: Arc<PostgresTaskRepository>,
}

/// Initialize the complete application: readiness gate, repository, server
pub async fn initialize_app(config: &Config) -> Result<App> {
    info!("Initializing application");

    let params = config
        .connection_params()
        .context("Failed to resolve database connection parameters")?;
    log_startup_info(config, &params);

    wait_for_database(config, &params).await?;

    let repository = create_repository(config, &params).await?;
    let server = create_server(Arc::clone(&repository));

    info!("Application initialized successfully");
    Ok(App { server, repository })
}
