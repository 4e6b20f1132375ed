//! Search form state and its query-string encoding.

use chrono::NaiveDate;

/// Parameters collected before a search is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    origin: String,
    destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub one_way: bool,
    pub flexible_dates: bool,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            origin: "PAR".to_string(),
            destination: "TYO".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2026, 3, 3).unwrap_or_default(),
            return_date: NaiveDate::from_ymd_opt(2026, 3, 4),
            one_way: true,
            flexible_dates: false,
        }
    }
}

impl SearchForm {
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Location codes are free text, upper-cased as typed.
    pub fn set_origin(&mut self, origin: &str) {
        self.origin = origin.to_uppercase();
    }

    pub fn set_destination(&mut self, destination: &str) {
        self.destination = destination.to_uppercase();
    }

    /// `/api/search` query string for the current state.
    pub fn query_string(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("origin", &self.origin)
            .append_pair("destination", &self.destination)
            .append_pair("departureDate", &self.departure_date.format("%Y-%m-%d").to_string())
            .append_pair("oneWay", if self.one_way { "true" } else { "false" })
            .append_pair("flexible", if self.flexible_dates { "true" } else { "false" });

        if !self.one_way {
            if let Some(ret) = self.return_date {
                query.append_pair("returnDate", &ret.format("%Y-%m-%d").to_string());
            }
        }
        query.finish()
    }
}
