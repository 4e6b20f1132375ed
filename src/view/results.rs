//! Results view state machine.
//!
//! ```text
//! Idle ──submit──▶ Searching ──finish──▶ Results(flights) | Empty
//!                      ▲                        │
//!                      └────────submit──────────┘
//! ```

use std::fmt::Write;

use crate::normalize::Flight;
use crate::view::card::{price_label, render_card};

pub const SEARCHING_MESSAGE: &str = "Searching best flights...";
pub const EMPTY_MESSAGE: &str = "No flights found for these dates. Try being more flexible.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsView {
    #[default]
    Idle,
    Searching,
    Results(Vec<Flight>),
    Empty,
}

/// What picking a card does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Open the deep link in a new browser context.
    OpenLink(String),
    /// No link; show an inline confirmation instead.
    Confirm(String),
}

impl ResultsView {
    /// A search was submitted. Previous results are discarded.
    pub fn submit(&mut self) {
        *self = ResultsView::Searching;
    }

    /// The search finished with these flights.
    pub fn finish(&mut self, flights: Vec<Flight>) {
        *self = if flights.is_empty() {
            ResultsView::Empty
        } else {
            ResultsView::Results(flights)
        };
    }

    pub fn flights(&self) -> &[Flight] {
        match self {
            ResultsView::Results(flights) => flights,
            _ => &[],
        }
    }

    /// Select the flight at `index` (zero based) in the current results.
    pub fn select(&self, index: usize) -> Option<Selection> {
        let flight = self.flights().get(index)?;
        Some(match &flight.deep_link {
            Some(link) => Selection::OpenLink(link.clone()),
            None => Selection::Confirm(format!(
                "Flight {} selected!\nPrice: {}",
                flight.flight_number,
                price_label(flight.price, &flight.currency)
            )),
        })
    }

    pub fn render(&self) -> String {
        match self {
            ResultsView::Idle => String::new(),
            ResultsView::Searching => SEARCHING_MESSAGE.to_string(),
            ResultsView::Empty => EMPTY_MESSAGE.to_string(),
            ResultsView::Results(flights) => {
                let mut out = String::new();
                let _ = writeln!(out, "Available Flights ({} results)\n", flights.len());
                for (i, flight) in flights.iter().enumerate() {
                    let _ = writeln!(out, "[{}] {}", i + 1, render_card(flight));
                }
                out
            }
        }
    }
}
