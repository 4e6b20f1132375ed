//! Search request types and error definitions.

use serde::Deserialize;
use thiserror::Error;
use url::form_urlencoded;

/// Raw `/api/search` query string. Every field is optional here so that
/// missing parameters surface as a `SearchError` instead of a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    /// `"true"` marks a one-way trip; anything else is a round trip.
    pub one_way: Option<String>,
    /// `"true"` requests the flexible-date expansion.
    pub flexible: Option<String>,
}

impl SearchRequest {
    /// Read a raw query string. Repeated text fields keep their first
    /// value; a repeated flag no longer reads as `"true"`. Unknown keys
    /// are ignored.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut req = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "origin" => keep_first(&mut req.origin, value),
                "destination" => keep_first(&mut req.destination, value),
                "departureDate" => keep_first(&mut req.departure_date, value),
                "returnDate" => keep_first(&mut req.return_date, value),
                "oneWay" => set_flag(&mut req.one_way, value),
                "flexible" => set_flag(&mut req.flexible, value),
                _ => {}
            }
        }
        req
    }
}

fn keep_first(slot: &mut Option<String>, value: String) {
    if slot.is_none() {
        *slot = Some(value);
    }
}

fn set_flag(slot: &mut Option<String>, value: String) {
    *slot = Some(if slot.is_some() { String::new() } else { value });
}

/// Validated search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub one_way: bool,
    pub flexible: bool,
}

impl SearchParams {
    /// Return date forwarded upstream: only for round trips that have one.
    pub fn effective_return_date(&self) -> Option<&str> {
        if self.one_way {
            return None;
        }
        self.return_date.as_deref().filter(|d| !d.is_empty())
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TryFrom<SearchRequest> for SearchParams {
    type Error = SearchError;

    fn try_from(req: SearchRequest) -> Result<Self, Self::Error> {
        let (Some(origin), Some(destination), Some(departure_date)) = (
            required(req.origin),
            required(req.destination),
            required(req.departure_date),
        ) else {
            return Err(SearchError::MissingParameters);
        };

        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date: req.return_date,
            one_way: req.one_way.as_deref() == Some("true"),
            flexible: req.flexible.as_deref() == Some("true"),
        })
    }
}

/// Errors that stop a search from producing any response body.
#[derive(Debug, Error)]
pub enum SearchError {
    /// origin, destination or departureDate absent or empty.
    #[error("Missing required parameters")]
    MissingParameters,

    /// Departure date could not be parsed for the flexible expansion.
    #[error("Invalid departure date '{date}': {reason}")]
    InvalidDate { date: String, reason: String },

    /// Expansion stepped outside the representable calendar.
    #[error("Date expansion out of range around '{0}'")]
    DateOutOfRange(String),

    /// The fan-out task did not complete.
    #[error("Fan-out task failed: {0}")]
    TaskFailed(String),
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
