//! Terminal rendering of search results.
//!
//! # Data Flow
//! ```text
//! form.rs (SearchForm → query string)
//!     → proxy /api/search
//!     → normalize::normalize_offers
//!     → results.rs (ResultsView state) → card.rs (text cards)
//! ```

pub mod card;
pub mod form;
pub mod results;

pub use card::render_card;
pub use form::SearchForm;
pub use results::{ResultsView, Selection};
