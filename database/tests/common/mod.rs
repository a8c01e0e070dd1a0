//! Shared PostgreSQL test harness.
//!
//! Uses the server named by `TASKBOARD_TEST_DATABASE_URL` when set, and
//! otherwise starts a throwaway PostgreSQL container (requires Docker). Each
//! harness gets its own schema, so tests never see each other's rows and
//! SERIAL ids start at 1.
//!
//! Tests using it are `#[ignore]`d; run them with `cargo test -- --ignored`.

use database::{ConnectionParams, PostgresTaskRepository, ReadinessGate};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

pub const TEST_DATABASE_URL_ENV: &str = "TASKBOARD_TEST_DATABASE_URL";

/// A reachable PostgreSQL server, kept alive for as long as this value lives
pub struct PostgresServer {
    options: PgConnectOptions,
    _container: Option<ContainerAsync<GenericImage>>,
}

impl PostgresServer {
    pub async fn start() -> Self {
        if let Ok(url) = std::env::var(TEST_DATABASE_URL_ENV) {
            return Self {
                options: PgConnectOptions::from_str(&url).expect("invalid test database URL"),
                _container: None,
            };
        }

        let container = GenericImage::new("postgres", "16-alpine")
            .with_exposed_port(5432.tcp())
            .with_wait_for(WaitFor::message_on_stderr(
                "database system is ready to accept connections",
            ))
            .with_startup_timeout(Duration::from_secs(120))
            .with_env_var("POSTGRES_HOST_AUTH_METHOD", "trust")
            .start()
            .await
            .expect("failed to start PostgreSQL container; is Docker running?");

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("failed to get PostgreSQL container port");

        // The image restarts the server once after init; wait for the final one
        let params = ConnectionParams::new("127.0.0.1", port, "postgres", "postgres", "postgres");
        ReadinessGate::new(
            Duration::from_secs(60),
            Duration::from_millis(500),
            Duration::from_secs(3),
        )
        .wait(&params)
        .await
        .expect("PostgreSQL container never accepted connections");

        Self {
            options: params.connect_options(),
            _container: Some(container),
        }
    }

    pub fn options(&self) -> PgConnectOptions {
        self.options.clone()
    }
}

pub struct TestDatabase {
    pub repo: PostgresTaskRepository,
    admin: PgPool,
    schema: String,
    _server: PostgresServer,
}

impl TestDatabase {
    /// Connect to a fresh, empty schema
    pub async fn connect() -> Self {
        let server = PostgresServer::start().await;

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(server.options())
            .await
            .expect("failed to connect to test database");

        let schema = format!("taskboard_test_{}", uuid::Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("failed to create test schema");

        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_with(server.options().options([("search_path", schema.as_str())]))
            .await
            .expect("failed to connect to test schema");

        Self {
            repo: PostgresTaskRepository::from_pool(pool),
            admin,
            schema,
            _server: server,
        }
    }

    pub async fn row_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(self.repo.pool())
            .await
            .expect("failed to count tasks")
    }

    pub async fn cleanup(self) {
        self.repo.close().await;
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .expect("failed to drop test schema");
    }
}
