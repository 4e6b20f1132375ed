//! Plain-text flight cards.

use chrono::NaiveDateTime;
use std::fmt::Write;

use crate::normalize::Flight;

/// `("10:30", "10 Mar")` for a provider timestamp, or the raw text.
fn clock_and_day(at: &str) -> (String, String) {
    let parsed = NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S%.f"));
    match parsed {
        Ok(dt) => (dt.format("%H:%M").to_string(), dt.format("%d %b").to_string()),
        Err(_) => (at.to_string(), String::new()),
    }
}

fn stops_label(stops: usize) -> String {
    match stops {
        0 => "Direct".to_string(),
        1 => "1 Stop".to_string(),
        n => format!("{} Stops", n),
    }
}

/// Price with the currency symbol when one is known.
pub fn price_label(price: f64, currency: &str) -> String {
    match currency {
        "EUR" => format!("{}€", price),
        "USD" => format!("${}", price),
        "GBP" => format!("£{}", price),
        other => format!("{} {}", price, other),
    }
}

#[allow(clippy::too_many_arguments)]
fn path_line(
    out: &mut String,
    label: &str,
    dep: &str,
    arr: &str,
    origin: &str,
    dest: &str,
    duration: &str,
    stops: usize,
) {
    let (dep_clock, dep_day) = clock_and_day(dep);
    let (arr_clock, arr_day) = clock_and_day(arr);
    let _ = writeln!(
        out,
        "  {:<8} {} {} ({}) --[{} | {}]--> {} {} ({})",
        label,
        dep_clock,
        origin,
        dep_day,
        duration,
        stops_label(stops),
        arr_clock,
        dest,
        arr_day
    );
}

/// Render one flight as a multi-line card.
pub fn render_card(flight: &Flight) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}  {}  total price",
        flight.airline,
        flight.flight_number,
        price_label(flight.price, &flight.currency)
    );
    path_line(
        &mut out,
        "Outbound",
        &flight.departure_time,
        &flight.arrival_time,
        &flight.origin,
        &flight.destination,
        &flight.duration,
        flight.stops,
    );
    if let Some(ret) = &flight.return_flight {
        path_line(
            &mut out,
            "Return",
            &ret.departure_time,
            &ret.arrival_time,
            &flight.destination,
            &flight.origin,
            &ret.duration,
            ret.stops,
        );
    }
    out
}
