//! Flight search proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 FLIGHT PROXY                  │
//!   GET /api/search      │  ┌────────┐   ┌────────┐   ┌──────────────┐  │
//!   ─────────────────────┼─▶│  http  │──▶│ search │──▶│   fan-out    │──┼──▶ upstream
//!                        │  │ server │   │ params │   │ (1 per date) │  │    (Amadeus)
//!                        │  └────────┘   └────────┘   └──────┬───────┘  │
//!   JSON offers          │                                   │          │
//!   ◀────────────────────┼───────────────────────────────────┘          │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use flight_proxy::config;
use flight_proxy::lifecycle::{signals, Shutdown};
use flight_proxy::observability::{logging, metrics};
use flight_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "flight-proxy")]
#[command(about = "Flight search fan-out proxy", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "FLIGHT_PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = config::load(args.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!("flight-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        currency = %config.upstream.currency,
        max_results = config.upstream.max_results,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::trigger_on_signal(&shutdown);

    let server = HttpServer::from_config(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
