//! HTTP Server
//!
//! Serves the job API over TCP with axum. The server runs on its own task and
//! is stopped through the returned `ServerHandle`.

use crate::handler::{self, AppState};
use axum::routing::get;
use axum::Router;
use joblist_core::JobService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 5000;

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    /// Port 0 binds an ephemeral port
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Routes, request tracing and CORS around a shared service
pub fn build_router(service: Arc<JobService>) -> Router {
    Router::new()
        .route(
            "/api/jobs",
            get(handler::list_jobs).post(handler::create_job),
        )
        .route("/api/jobs/stats", get(handler::job_stats))
        .route(
            "/api/jobs/{id}",
            get(handler::get_job)
                .put(handler::update_job)
                .delete(handler::delete_job),
        )
        .route("/api/health", get(handler::health))
        .fallback(handler::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(AppState::new(service))
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    service: Arc<JobService>,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, service: Arc<JobService>) -> Self {
        Self { config, service }
    }

    /// Bind the listener and start serving in the background
    pub async fn start(self) -> std::io::Result<ServerHandle> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;

        info!(addr = %local_addr, "Starting HTTP server");

        let app = build_router(self.service);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await;
            if let Err(e) = &result {
                error!(error = %e, "HTTP server terminated with error");
            }
            result
        });

        Ok(ServerHandle {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }
}

/// Handle to a running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting connections. In-flight requests are allowed to finish.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Wait until the server task has exited
    pub async fn stopped(self) -> std::io::Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(join_err) => Err(std::io::Error::other(join_err)),
        }
    }
}
