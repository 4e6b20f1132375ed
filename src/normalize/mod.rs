//! Upstream offer → display record normalization.

pub mod flight;
pub mod offer;

pub use flight::{Flight, ReturnFlight};
pub use offer::{date_token, normalize_offer, normalize_offers, parse_duration};
