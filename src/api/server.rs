//! HTTP server for the calculator REST API
//!
//! Provides the dashboard-facing API (/api/v1/*) with CORS, request tracing,
//! rate limiting, and graceful shutdown.

use crate::api::handlers;
use crate::api::rate_limiter::{rate_limit_middleware, RateLimiterState};
use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// API server manager
pub struct ApiServer {
    state: Arc<AppState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Create a new server
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            shutdown_tx: None,
        }
    }

    /// Build the router with all routes and middleware
    pub fn router(state: Arc<AppState>) -> Router {
        let rate_limiter = Arc::new(RateLimiterState::new(&state.config.rate_limits));

        // CORS is wide open: the API serves the local dashboard only
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            // Health check
            .route("/health", get(handlers::health_check))
            .route("/", get(handlers::health_check))
            // Session lifecycle
            .route("/api/v1/session", post(handlers::open_session))
            .route("/api/v1/session/close", post(handlers::close_session))
            // Catalog lookup
            .route("/api/v1/search", post(handlers::search_catalog))
            // Bid ledger
            .route("/api/v1/bid", post(handlers::get_bid))
            .route("/api/v1/bid/add", post(handlers::add_item))
            .route("/api/v1/bid/remove", post(handlers::remove_item))
            .route("/api/v1/bid/quantity", post(handlers::update_quantity))
            .route("/api/v1/bid/markup", post(handlers::update_markup))
            .route("/api/v1/bid/globalmarkup", post(handlers::set_global_markup))
            .route("/api/v1/bid/export", post(handlers::export_bid))
            // State and middleware
            .with_state(state)
            .layer(middleware::from_fn_with_state(
                rate_limiter,
                rate_limit_middleware,
            ))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Start the server
    pub async fn start(&mut self) -> Result<()> {
        let host = self.state.config.server.host.clone();
        let port = self.state.config.server.port;

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid address {}:{}: {}", host, port, e)))?;

        let app = Self::router(self.state.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        self.shutdown_tx = Some(shutdown_tx);

        info!("Starting ContractSIG calculator API on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("API server shutting down");
            });

            if let Err(e) = server.await {
                error!("API server error: {}", e);
            }
        });

        info!("ContractSIG calculator API started successfully");
        info!("");
        info!("=== Endpoints ===");
        info!("  GET  http://{}:{}/health", host, port);
        info!("  POST http://{}:{}/api/v1/session", host, port);
        info!("  POST http://{}:{}/api/v1/session/close", host, port);
        info!("  POST http://{}:{}/api/v1/search", host, port);
        info!("  POST http://{}:{}/api/v1/bid", host, port);
        info!("  POST http://{}:{}/api/v1/bid/add", host, port);
        info!("  POST http://{}:{}/api/v1/bid/remove", host, port);
        info!("  POST http://{}:{}/api/v1/bid/quantity", host, port);
        info!("  POST http://{}:{}/api/v1/bid/markup", host, port);
        info!("  POST http://{}:{}/api/v1/bid/globalmarkup", host, port);
        info!("  POST http://{}:{}/api/v1/bid/export", host, port);

        Ok(())
    }

    /// Stop the server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            info!("API server stop signal sent");
        }
    }

    /// Check if server is running
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some()
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.stop();
    }
}
