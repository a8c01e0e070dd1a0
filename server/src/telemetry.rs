use anyhow::{Context, Result};
use database::ConnectionParams;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::{Config, LogFormat, LoggingConfig};

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log level configuration")
}

/// Initialize the tracing subscriber for logging
pub fn init_telemetry(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;

    let registry = Registry::default().with(env_filter);

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_span_list(true)
                .flatten_event(true);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false);

            registry
                .with(fmt_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }

    tracing::info!(
        log_level = %config.level,
        log_format = %config.format,
        "Telemetry initialized"
    );

    Ok(())
}

/// Log the resolved configuration. `params` renders without the password.
pub fn log_startup_info(config: &Config, params: &ConnectionParams) {
    let server_address = config
        .server_address()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| config.server.listen_addr.clone());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        server_address = %server_address,
        database = %params,
        max_connections = config.database.max_connections,
        startup_timeout_secs = config.database.startup_timeout_secs,
        retry_interval_secs = config.database.retry_interval_secs,
        "TaskBoard starting up"
    );
}

/// Log server shutdown information
pub fn log_shutdown_info() {
    tracing::info!("TaskBoard shut down cleanly");
}

/// Log an error together with its cause chain
pub fn report_error(error: &anyhow::Error, context: &str) {
    tracing::error!(
        error = %error,
        context = context,
        "Operation failed"
    );

    for (depth, cause) in error.chain().skip(1).enumerate() {
        tracing::error!(
            error = %cause,
            depth = depth + 1,
            "Error cause"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_configured_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let config = LoggingConfig {
                level: level.to_string(),
                format: LogFormat::Compact,
            };
            assert!(build_env_filter(&config).is_ok(), "{level}");
        }
    }

    #[test]
    fn test_startup_info_never_contains_password() {
        let params = ConnectionParams::new("postgres", 5432, "taskboard", "taskboard", "hunter2");
        let rendered = format!("{params}");
        assert!(!rendered.contains("hunter2"));

        // Must not panic without a subscriber installed
        log_startup_info(&Config::default(), &params);
        log_shutdown_info();
    }

    #[test]
    fn test_report_error_walks_chain() {
        let error = anyhow::anyhow!("connection refused").context("Database not ready");
        assert_eq!(error.chain().count(), 2);
        report_error(&error, "startup");
    }
}
