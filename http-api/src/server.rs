//! HTTP server: router construction and serving.

use crate::{handlers, request_logger::request_logging_middleware};
use axum::{middleware, routing::get, Router};
use std::{future::Future, net::SocketAddr, sync::Arc};
use taskboard_core::TaskRepository;
use tracing::info;

/// Shared state handed to every handler
///
/// Holds no mutable data; all task state lives in the repository's store.
pub struct AppState<R> {
    pub repository: Arc<R>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

/// Build the application router over `repository`
pub fn create_router<R: TaskRepository + 'static>(repository: Arc<R>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/tasks",
            get(handlers::list_tasks::<R>).post(handlers::create_task::<R>),
        )
        .route(
            "/tasks/:id",
            axum::routing::put(handlers::update_task::<R>).delete(handlers::delete_task::<R>),
        )
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(AppState { repository })
}

/// TaskBoard HTTP server
pub struct TaskBoardServer<R> {
    repository: Arc<R>,
}

impl<R: TaskRepository + 'static> TaskBoardServer<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// The router this server serves
    pub fn router(&self) -> Router {
        create_router(Arc::clone(&self.repository))
    }

    /// Serve until the process is terminated
    pub async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.serve_with_shutdown(addr, std::future::pending()).await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests
    pub async fn serve_with_shutdown<F>(
        self,
        addr: &str,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| format!("Invalid address '{addr}': {e}"))?;

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;
        info!(address = %listener.local_addr()?, "TaskBoard API listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
