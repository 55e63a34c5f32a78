//! Axum-based RPC server.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use surety_node::RegistryService;

use crate::error::RpcError;
use crate::handlers;

/// Shared state handed to every handler.
pub struct RpcState {
    pub service: RegistryService,
    /// Serve `/metrics`; otherwise it answers 404.
    pub enable_metrics: bool,
}

pub struct RpcServer {
    pub port: u16,
    pub state: Arc<RpcState>,
}

impl RpcServer {
    pub fn new(port: u16, service: RegistryService, enable_metrics: bool) -> Self {
        Self {
            port,
            state: Arc::new(RpcState {
                service,
                enable_metrics,
            }),
        }
    }

    /// Build the router without binding a socket.
    pub fn router(state: Arc<RpcState>) -> Router {
        Router::new()
            .route("/status", get(handlers::get_status).post(handlers::set_status))
            .route("/callers/authorize", post(handlers::authorize_caller))
            .route("/callers/deauthorize", post(handlers::deauthorize_caller))
            .route("/fund", post(handlers::fund))
            .route("/register", post(handlers::register))
            .route("/airlines", get(handlers::airline_count))
            .route("/airlines/:id", get(handlers::airline))
            .route("/proposals", get(handlers::proposals))
            .route("/escrow", get(handlers::escrow))
            .route("/metrics", get(handlers::metrics))
            .with_state(state)
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn start(
        &self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), RpcError> {
        let app = Self::router(Arc::clone(&self.state));
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("bind {addr}: {e}")))?;
        info!(%addr, "RPC server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        info!("RPC server stopped");
        Ok(())
    }
}
