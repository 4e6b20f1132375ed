//! Flexible-date expansion.

use chrono::{Days, NaiveDate};

use crate::search::types::{SearchError, SearchResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dates to query for a departure.
///
/// Without `flexible` the departure string is returned verbatim and never
/// parsed. With it, the base date comes first, followed by base−window ..
/// base+window (skipping the base), deduplicated in that order.
pub fn expand_dates(departure: &str, flexible: bool, window: u32) -> SearchResult<Vec<String>> {
    if !flexible {
        return Ok(vec![departure.to_string()]);
    }

    let base = NaiveDate::parse_from_str(departure, DATE_FORMAT).map_err(|e| {
        SearchError::InvalidDate {
            date: departure.to_string(),
            reason: e.to_string(),
        }
    })?;

    let window = i64::from(window);
    let mut dates = vec![departure.to_string()];
    for offset in -window..=window {
        if offset == 0 {
            continue;
        }
        let shifted = shift(base, offset)
            .ok_or_else(|| SearchError::DateOutOfRange(departure.to_string()))?;
        dates.push(shifted.format(DATE_FORMAT).to_string());
    }

    let mut unique = Vec::with_capacity(dates.len());
    for date in dates {
        if !unique.contains(&date) {
            unique.push(date);
        }
    }
    Ok(unique)
}

fn shift(base: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset < 0 {
        base.checked_sub_days(days)
    } else {
        base.checked_add_days(days)
    }
}
