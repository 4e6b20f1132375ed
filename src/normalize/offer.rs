//! Upstream offer shape and the offer → `Flight` mapping.
//!
//! Every upstream field is optional at parse time; an offer missing
//! something the display record needs is skipped, never fatal.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::normalize::flight::{Flight, ReturnFlight};

const DEEP_LINK_BASE: &str = "https://www.skyscanner.com/transport/flights";
const AIRLINE_LOGO_BASE: &str = "https://content.r9cdn.net/rimg/provider-logos/airlines/v";
const DURATION_PREFIX: &str = "PT";

#[derive(Debug, Deserialize)]
struct RawOffer {
    id: Option<String>,
    #[serde(default)]
    itineraries: Vec<RawItinerary>,
    price: Option<RawPrice>,
}

#[derive(Debug, Deserialize)]
struct RawItinerary {
    duration: Option<String>,
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    departure: Option<RawEndpoint>,
    arrival: Option<RawEndpoint>,
    carrier_code: Option<String>,
    number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpoint {
    iata_code: Option<String>,
    at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    total: Option<String>,
    currency: Option<String>,
}

/// First-segment departure, last-segment arrival.
#[derive(Debug)]
struct Leg {
    carrier: String,
    flight_number: String,
    origin: String,
    departure_at: String,
    destination: String,
    arrival_at: String,
    duration: String,
    stops: usize,
}

impl Leg {
    fn from_itinerary(itinerary: &RawItinerary) -> Option<Self> {
        let first = itinerary.segments.first()?;
        let last = itinerary.segments.last()?;

        let carrier = first.carrier_code.clone()?;
        let number = first.number.as_deref()?;
        let departure = first.departure.as_ref()?;
        let arrival = last.arrival.as_ref()?;

        Some(Self {
            flight_number: format!("{}{}", carrier, number),
            carrier,
            origin: departure.iata_code.clone()?,
            departure_at: departure.at.clone()?,
            destination: arrival.iata_code.clone()?,
            arrival_at: arrival.at.clone()?,
            duration: parse_duration(itinerary.duration.as_deref()),
            stops: itinerary.segments.len() - 1,
        })
    }
}

/// `"PT5H30M"` → `"5h30m"`; missing or empty → `""`.
pub fn parse_duration(raw: Option<&str>) -> String {
    match raw {
        Some(d) if !d.is_empty() => d.strip_prefix(DURATION_PREFIX).unwrap_or(d).to_lowercase(),
        _ => String::new(),
    }
}

/// Six-digit `yyMMdd` token for a provider timestamp.
pub fn date_token(at: &str) -> Option<String> {
    let date = NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(at).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDate::parse_from_str(at, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%y%m%d").to_string())
}

fn deep_link(outbound: &Leg, inbound: Option<&Leg>) -> Option<String> {
    let mut link = format!(
        "{}/{}/{}/{}",
        DEEP_LINK_BASE,
        outbound.origin.to_lowercase(),
        outbound.destination.to_lowercase(),
        date_token(&outbound.departure_at)?
    );
    if let Some(inbound) = inbound {
        link.push('/');
        link.push_str(&date_token(&inbound.departure_at)?);
    }
    Some(link)
}

/// Map one upstream offer, or `None` when required fields are missing.
pub fn normalize_offer(offer: &Value) -> Option<Flight> {
    let raw = RawOffer::deserialize(offer).ok()?;

    let outbound = Leg::from_itinerary(raw.itineraries.first()?)?;
    let inbound = match raw.itineraries.get(1) {
        Some(itinerary) => Some(Leg::from_itinerary(itinerary)?),
        None => None,
    };

    let price = raw.price?;
    let total: f64 = price.total?.trim().parse().ok()?;
    let currency = price.currency?;

    let deep_link = deep_link(&outbound, inbound.as_ref());
    let return_flight = inbound.map(|leg| ReturnFlight {
        airline: leg.carrier,
        flight_number: leg.flight_number,
        departure_time: leg.departure_at,
        arrival_time: leg.arrival_at,
        duration: leg.duration,
        stops: leg.stops,
    });

    Some(Flight {
        id: raw.id?,
        airline_logo: format!("{}/{}.png", AIRLINE_LOGO_BASE, outbound.carrier),
        airline: outbound.carrier,
        flight_number: outbound.flight_number,
        price: total,
        currency,
        departure_time: outbound.departure_at,
        arrival_time: outbound.arrival_at,
        origin: outbound.origin,
        destination: outbound.destination,
        duration: outbound.duration,
        stops: outbound.stops,
        return_flight,
        deep_link,
    })
}

/// Map a payload of offers. Anything other than a JSON array yields an
/// empty list; malformed entries are dropped individually.
pub fn normalize_offers(payload: &Value) -> Vec<Flight> {
    let Value::Array(offers) = payload else {
        tracing::warn!("Offer payload is not an array, treating as empty");
        return Vec::new();
    };

    let flights: Vec<Flight> = offers.iter().filter_map(normalize_offer).collect();
    if flights.len() < offers.len() {
        tracing::debug!(
            skipped = offers.len() - flights.len(),
            "Skipped offers with missing fields"
        );
    }
    flights
}
