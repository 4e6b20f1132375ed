//! Search fan-out subsystem.
//!
//! # Data Flow
//! ```text
//! /api/search query string
//!     → types.rs (SearchRequest → SearchParams, required-field check)
//!     → dates.rs (flexible expansion, dedup)
//!     → fanout.rs (one upstream query per date, joined)
//!     → FanOutOutcome (flat offers + failed dates)
//! ```

pub mod dates;
pub mod fanout;
pub mod types;

pub use dates::expand_dates;
pub use fanout::{FanOut, FanOutOutcome, QuerySettings};
pub use types::{SearchError, SearchParams, SearchRequest, SearchResult};
