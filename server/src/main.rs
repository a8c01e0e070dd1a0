use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use taskboard_server::{
    config::Config,
    exit_code_for, initialize_app,
    setup::{EXIT_CONFIG, EXIT_SERVER},
    telemetry::{init_telemetry, log_shutdown_info, report_error},
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "TaskBoard REST service")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Listen address override
    #[arg(long, env = "LISTEN_ADDR")]
    listen_addr: Option<String>,

    /// Port override
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log level override
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(ref listen_addr) = cli.listen_addr {
        config.server.listen_addr = listen_addr.clone();
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(ref log_level) = cli.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => info!("Received SIGINT, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv::dotenv().ok();

    // clap's own exit code for usage errors is 2, which is reserved for startup failures
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_CONFIG } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let config = match load_config(&cli).context("Failed to load configuration") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(e) = init_telemetry(&config.logging) {
        eprintln!("{e:#}");
        std::process::exit(EXIT_CONFIG);
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "Configuration validation failed");
        std::process::exit(EXIT_CONFIG);
    }
    info!("Configuration validation passed");

    let addr = match config.server_address() {
        Ok(addr) => addr.to_string(),
        Err(e) => {
            error!(error = %e, "Invalid server address");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let app = match initialize_app(&config).await {
        Ok(app) => app,
        Err(e) => {
            report_error(&e, "startup");
            std::process::exit(exit_code_for(&e));
        }
    };

    info!("Starting TaskBoard on {}", addr);

    if let Err(e) = app.server.serve_with_shutdown(&addr, shutdown_signal()).await {
        error!(error = %e, "HTTP server error");
        app.repository.close().await;
        std::process::exit(EXIT_SERVER);
    }

    app.repository.close().await;
    log_shutdown_info();
}
