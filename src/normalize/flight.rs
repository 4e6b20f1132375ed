//! Normalized flight display records.

use serde::{Deserialize, Serialize};

/// One upstream offer flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: String,
    /// Carrier code of the first outbound segment.
    pub airline: String,
    pub airline_logo: String,
    /// Carrier code followed by the flight number, e.g. "AF276".
    pub flight_number: String,
    /// Trip-level total.
    pub price: f64,
    pub currency: String,

    pub departure_time: String,
    pub arrival_time: String,
    pub origin: String,
    pub destination: String,
    pub duration: String,
    pub stops: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_flight: Option<ReturnFlight>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_link: Option<String>,
}

/// Return leg of a round trip. Priced at trip level only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnFlight {
    pub airline: String,
    pub flight_number: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration: String,
    pub stops: usize,
}
