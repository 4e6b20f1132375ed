//! Upstream query types, the source trait and error definitions.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// One per-date query sent to the flight-offer provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    /// `yyyy-MM-dd`, forwarded verbatim.
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: u32,
    pub currency: String,
    pub max_results: u32,
}

impl FlightQuery {
    /// Query-string pairs in the provider's parameter naming.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("originLocationCode", self.origin.clone()),
            ("destinationLocationCode", self.destination.clone()),
            ("departureDate", self.departure_date.clone()),
            ("adults", self.adults.to_string()),
            ("currencyCode", self.currency.clone()),
            ("max", self.max_results.to_string()),
        ];
        if let Some(ret) = &self.return_date {
            params.push(("returnDate", ret.clone()));
        }
        params
    }
}

/// Errors that can occur while talking to the provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport failure or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Token endpoint refused the credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body did not have the expected shape.
    #[error("Unexpected payload: {0}")]
    Payload(String),

    /// Client could not be built from configuration.
    #[error("Invalid upstream configuration: {0}")]
    Config(String),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Anything that can answer a single-date flight-offer query.
///
/// Offers are returned as raw JSON so the proxy can pass them through
/// untouched.
#[async_trait]
pub trait FlightOfferSource: Send + Sync {
    async fn search_offers(&self, query: &FlightQuery) -> UpstreamResult<Vec<Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(return_date: Option<&str>) -> FlightQuery {
        FlightQuery {
            origin: "PAR".into(),
            destination: "TYO".into(),
            departure_date: "2025-03-10".into(),
            return_date: return_date.map(String::from),
            adults: 1,
            currency: "EUR".into(),
            max_results: 5,
        }
    }

    #[test]
    fn test_params_without_return_date() {
        let params = query(None).to_params();
        assert_eq!(params.len(), 6);
        assert!(params.contains(&("max", "5".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "returnDate"));
    }

    #[test]
    fn test_params_with_return_date() {
        let params = query(Some("2025-03-20")).to_params();
        assert!(params.contains(&("returnDate", "2025-03-20".to_string())));
        assert!(params.contains(&("originLocationCode", "PAR".to_string())));
    }

    #[test]
    fn test_error_display() {
        let err = UpstreamError::Status { status: 400, body: "bad date".into() };
        assert_eq!(err.to_string(), "Provider returned status 400: bad date");
    }
}
