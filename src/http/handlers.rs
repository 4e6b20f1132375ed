//! Route handlers.

use axum::{
    extract::{RawQuery, State},
    http::{HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Instant;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::search::{SearchParams, SearchRequest};

/// Number of per-date sub-queries that failed and were left out.
pub const X_UPSTREAM_FAILURES: HeaderName = HeaderName::from_static("x-upstream-failures");

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// `GET /api/search`: fan the query out over its dates and return the
/// concatenated upstream offers untouched.
pub async fn search_flights(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response {
    let start_time = Instant::now();

    let request = SearchRequest::from_query(query.as_deref());
    let response = match run_search(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            if let ApiError::Validation(reason) = &e {
                tracing::warn!(reason = %reason, "Rejected search request");
            }
            e.into_response()
        }
    };

    metrics::record_search(response.status().as_u16(), start_time);
    response
}

async fn run_search(state: &AppState, request: SearchRequest) -> Result<Response, ApiError> {
    let params = SearchParams::try_from(request)?;

    tracing::debug!(
        origin = %params.origin,
        destination = %params.destination,
        departure_date = %params.departure_date,
        one_way = params.one_way,
        flexible = params.flexible,
        "Searching flights"
    );

    let outcome = state.fan_out.run_detached(params).await?;
    let failures = outcome.failed_dates.len().to_string();

    Ok((
        StatusCode::OK,
        [(X_UPSTREAM_FAILURES, failures)],
        Json(outcome.offers),
    )
        .into_response())
}
