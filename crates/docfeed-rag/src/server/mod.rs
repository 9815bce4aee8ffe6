//! HTTP server for the RAG backend

pub mod routes;
pub mod state;

use axum::{http::HeaderValue, routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use state::AppState;

/// RAG HTTP server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Create a new server with production providers
    pub fn new(config: RagConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Start serving requests
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = build_router(self.state);

        tracing::info!("Starting RAG server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the full router for the given state
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config()
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload_size = state.config().server.max_upload_size;

    Router::new()
        .route("/health", get(health_check))
        .merge(routes::api_routes(max_upload_size))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
