//! Upstream flight-offer provider subsystem.
//!
//! # Data Flow
//! ```text
//! Fan-out task (one per date)
//!     → FlightOfferSource::search_offers
//!     → client.rs (token exchange, GET flight-offers)
//!     → Vec<serde_json::Value> (pass-through offers)
//! ```
//!
//! # Design Decisions
//! - The source is a trait object injected at the composition root
//! - Offers stay raw JSON here; shaping happens in `normalize`
//! - Timeouts come from the HTTP client, not the proxy

pub mod client;
pub mod types;

pub use client::AmadeusClient;
pub use types::{FlightOfferSource, FlightQuery, UpstreamError, UpstreamResult};
