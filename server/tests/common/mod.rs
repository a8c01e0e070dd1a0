//! PostgreSQL harness for end-to-end tests.
//!
//! Uses `TASKBOARD_TEST_DATABASE_URL` when set, otherwise a throwaway
//! PostgreSQL container (requires Docker). Each harness owns a fresh schema,
//! so the store starts empty and SERIAL ids start at 1.
//!
//! Tests using it are `#[ignore]`d; run them with `cargo test -- --ignored`.

use database::{ConnectionParams, PostgresTaskRepository, ReadinessGate};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

pub const TEST_DATABASE_URL_ENV: &str = "TASKBOARD_TEST_DATABASE_URL";

pub struct TestStore {
    options: PgConnectOptions,
    admin: PgPool,
    schema: String,
    _container: Option<ContainerAsync<GenericImage>>,
}

async fn start_container() -> (PgConnectOptions, ContainerAsync<GenericImage>) {
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

    let params = ConnectionParams::new("127.0.0.1", port, "postgres", "postgres", "postgres");
    ReadinessGate::new(
        Duration::from_secs(60),
        Duration::from_millis(500),
        Duration::from_secs(3),
    )
    .wait(&params)
    .await
    .expect("PostgreSQL container never accepted connections");

    (params.connect_options(), container)
}

impl TestStore {
    pub async fn create() -> Self {
        let (base, container) = match std::env::var(TEST_DATABASE_URL_ENV) {
            Ok(url) => (
                PgConnectOptions::from_str(&url).expect("invalid test database URL"),
                None,
            ),
            Err(_) => {
                let (options, container) = start_container().await;
                (options, Some(container))
            }
        };

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(base.clone())
            .await
            .expect("failed to connect to test database");

        let schema = format!("taskboard_e2e_{}", uuid::Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("failed to create test schema");

        Self {
            options: base.options([("search_path", schema.as_str())]),
            admin,
            schema,
            _container: container,
        }
    }

    /// A new repository over this store, as a fresh process would open it
    pub async fn repository(&self) -> Arc<PostgresTaskRepository> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_with(self.options.clone())
            .await
            .expect("failed to connect to test schema");
        Arc::new(PostgresTaskRepository::from_pool(pool))
    }

    pub async fn cleanup(self) {
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .expect("failed to drop test schema");
    }
}
