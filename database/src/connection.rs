//! Connection parameters and the connection factory.

use crate::common::sqlx_error_to_task_error;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection, PgConnection, PgPool,
};
use std::{fmt, path::Path, time::Duration};
use taskboard_core::error::{Result, TaskError};

/// Read a secret from a file, trimming surrounding whitespace.
pub fn read_secret(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map(|contents| contents.trim().to_string())
        .map_err(|e| {
            TaskError::Configuration(format!(
                "Failed to read secret file {}: {e}",
                path.display()
            ))
        })
}

/// Resolved PostgreSQL connection parameters.
///
/// Built once at startup and shared by the readiness gate and the
/// repository. The password never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    host: String,
    port: u16,
    database: String,
    user: String,
    password: String,
}

impl ConnectionParams {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Build parameters whose password is the trimmed contents of `password_file`
    ///
    /// # Returns
    /// * `Err(TaskError::Configuration)` - If the file is missing or unreadable
    pub fn with_password_file(
        host: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password_file: &Path,
    ) -> Result<Self> {
        let password = read_secret(password_file)?;
        Ok(Self::new(host, port, database, user, password))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Driver options for these parameters
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .application_name("taskboard")
    }

    /// Open a single connection with the driver's default timeout
    pub async fn connect(&self) -> Result<PgConnection> {
        PgConnection::connect_with(&self.connect_options())
            .await
            .map_err(sqlx_error_to_task_error)
    }

    /// Open a single connection, giving up after `timeout`
    pub async fn connect_with_timeout(&self, timeout: Duration) -> Result<PgConnection> {
        match tokio::time::timeout(timeout, self.connect()).await {
            Ok(result) => result,
            Err(_) => Err(TaskError::Database(format!(
                "Connection to {}:{} timed out after {}s",
                self.host,
                self.port,
                timeout.as_secs_f32()
            ))),
        }
    }

    /// Create the operational connection pool
    pub async fn create_pool(&self, max_connections: u32) -> Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(self.connect_options())
            .await
            .map_err(sqlx_error_to_task_error)
    }
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "postgres://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}
