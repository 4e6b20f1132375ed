//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, CORS)
//! - Optionally host the bundled front-end with an index.html fallback
//! - Bind server to listener and stop on the shutdown signal

use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::search::{FanOut, QuerySettings};
use crate::upstream::{AmadeusClient, FlightOfferSource, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fan_out: FanOut,
}

/// HTTP server for the flight search proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server that queries `source` for every date.
    pub fn new(config: ProxyConfig, source: Arc<dyn FlightOfferSource>) -> Self {
        let settings = QuerySettings::from_config(&config.upstream, &config.search);
        let state = AppState {
            fan_out: FanOut::new(source, settings),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Create a server backed by the configured Amadeus endpoint.
    pub fn from_config(config: ProxyConfig) -> UpstreamResult<Self> {
        let client = AmadeusClient::new(&config.upstream)?;
        tracing::info!(upstream = ?client, "Upstream client ready");
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/api/search", get(handlers::search_flights))
            .route("/health", get(handlers::health))
            .with_state(state);

        if let Some(dir) = &config.static_files.dir {
            let index = Path::new(dir).join("index.html");
            tracing::info!(dir = %dir, "Serving static files");
            router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
        }

        router
            .layer(CorsLayer::permissive())
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(set_request_id_layer())
    }

    /// The router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
