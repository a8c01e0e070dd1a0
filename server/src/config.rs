use anyhow::{anyhow, Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use database::ConnectionParams;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use taskboard_core::TaskError;

/// Prefix for `TASKBOARD_<SECTION>__<KEY>` overrides
pub const ENV_PREFIX: &str = "TASKBOARD";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    /// Database name
    pub name: String,
    pub user: String,
    /// File holding the password; its contents are trimmed
    pub password_file: PathBuf,
    /// Maximum number of database connections in the pool
    pub max_connections: u32,
    /// How long the readiness gate keeps retrying before giving up
    pub startup_timeout_secs: u64,
    /// Pause between readiness probes
    pub retry_interval_secs: u64,
    /// Connect timeout of a single readiness probe
    pub probe_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Listen address for the HTTP API
    pub listen_addr: String,
    /// Port number to listen on
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (pretty, json, compact)
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(anyhow!(
                "Invalid log format: {other}. Must be one of: pretty, json, compact"
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        };
        f.write_str(name)
    }
}

impl Config {
    /// Load configuration from the embedded defaults, an optional file and the
    /// process environment
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_file, std::env::vars().collect())
    }

    /// Same as [`Config::load`] with an explicit environment
    pub fn load_with_env(config_file: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let mut builder = ConfigBuilder::builder().add_source(File::from_str(
            include_str!("../config/default.toml"),
            FileFormat::Toml,
        ));

        if let Some(path) = config_file {
            builder = builder.add_source(
                File::from(path.to_path_buf())
                    .required(true)
                    .format(FileFormat::Toml),
            );
        }

        // TASKBOARD_SERVER__PORT=9000 -> server.port
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(Some(env.clone())),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        let mut result: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        result.apply_standard_env_vars(&env)?;

        Ok(result)
    }

    /// Apply the unprefixed variables used by container deployments
    fn apply_standard_env_vars(&mut self, env: &HashMap<String, String>) -> Result<()> {
        if let Some(host) = env.get("DB_HOST") {
            self.database.host = host.clone();
        }

        if let Some(port) = env.get("DB_PORT") {
            self.database.port = parse_port("DB_PORT", port)?;
        }

        if let Some(name) = env.get("DB_NAME") {
            self.database.name = name.clone();
        }

        if let Some(user) = env.get("DB_USER") {
            self.database.user = user.clone();
        }

        if let Some(password_file) = env.get("DB_PASSWORD_FILE") {
            self.database.password_file = PathBuf::from(password_file);
        }

        if let Some(listen_addr) = env.get("LISTEN_ADDR") {
            self.server.listen_addr = listen_addr.clone();
        }

        if let Some(port) = env.get("PORT") {
            self.server.port = parse_port("PORT", port)?;
        }

        if let Some(level) = env.get("LOG_LEVEL") {
            self.logging.level = level.clone();
        }

        if let Some(format) = env.get("LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }

    /// Get the server socket address
    pub fn server_address(&self) -> Result<SocketAddr, TaskError> {
        let ip: IpAddr = self.server.listen_addr.trim().parse().map_err(|e| {
            TaskError::Configuration(format!(
                "Invalid listen address '{}': {e}",
                self.server.listen_addr
            ))
        })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// Resolve connection parameters, reading the password file
    pub fn connection_params(&self) -> Result<ConnectionParams, TaskError> {
        ConnectionParams::with_password_file(
            self.database.host.clone(),
            self.database.port,
            self.database.name.clone(),
            self.database.user.clone(),
            &self.database.password_file,
        )
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.database.startup_timeout_secs)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.database.retry_interval_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.database.probe_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), TaskError> {
        let invalid = |msg: String| -> Result<(), TaskError> { Err(TaskError::Configuration(msg)) };

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return invalid(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ));
            }
        }

        if self.server.port == 0 {
            return invalid("Server port cannot be 0".to_string());
        }

        self.server_address()?;

        if self.database.port == 0 {
            return invalid("Database port cannot be 0".to_string());
        }

        for (field, value) in [
            ("host", &self.database.host),
            ("name", &self.database.name),
            ("user", &self.database.user),
        ] {
            if value.trim().is_empty() {
                return invalid(format!("Database {field} cannot be empty"));
            }
        }

        if self.database.max_connections == 0 {
            return invalid("Database max_connections must be greater than 0".to_string());
        }

        if self.database.startup_timeout_secs == 0 {
            return invalid("Database startup_timeout_secs must be greater than 0".to_string());
        }

        if self.database.retry_interval_secs == 0 {
            return invalid("Database retry_interval_secs must be greater than 0".to_string());
        }

        if self.database.probe_timeout_secs == 0 {
            return invalid("Database probe_timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

fn parse_port(var: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{var} must be a port number, got '{value}'"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                host: "postgres".to_string(),
                port: 5432,
                name: "taskboard".to_string(),
                user: "taskboard".to_string(),
                password_file: PathBuf::from("/run/secrets/postgres_password"),
                max_connections: 5,
                startup_timeout_secs: 60,
                retry_interval_secs: 2,
                probe_timeout_secs: 3,
            },
            server: ServerConfig {
                listen_addr: "0.0.0.0".to_string(),
                port: 8000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}
