//! Per-date fan-out to the upstream provider.
//!
//! # Responsibilities
//! - Turn validated parameters into one `FlightQuery` per unique date
//! - Run every query concurrently and wait for all of them
//! - Drop failed dates from the result, keep a count for diagnostics
//!
//! # Design Decisions
//! - A failing date never aborts the others and is never retried
//! - `run_detached` moves the work onto its own task so a client
//!   disconnect cannot cancel sub-queries half way
//! - Results keep expansion order, then per-date upstream order

use futures_util::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::config::{SearchConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::search::dates::expand_dates;
use crate::search::types::{SearchError, SearchParams, SearchResult};
use crate::upstream::{FlightOfferSource, FlightQuery};

/// Fixed parts of every upstream query.
#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub adults: u32,
    pub currency: String,
    pub max_results: u32,
    pub flexible_window_days: u32,
}

impl QuerySettings {
    pub fn from_config(upstream: &UpstreamConfig, search: &SearchConfig) -> Self {
        Self {
            adults: upstream.adults,
            currency: upstream.currency.clone(),
            max_results: upstream.max_results,
            flexible_window_days: search.flexible_window_days,
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self::from_config(&UpstreamConfig::default(), &SearchConfig::default())
    }
}

/// Offers gathered from every date that answered.
#[derive(Debug, Default)]
pub struct FanOutOutcome {
    pub offers: Vec<Value>,
    pub queried_dates: usize,
    pub failed_dates: Vec<String>,
}

/// Fans a search out over its candidate dates.
#[derive(Clone)]
pub struct FanOut {
    source: Arc<dyn FlightOfferSource>,
    settings: QuerySettings,
}

impl FanOut {
    pub fn new(source: Arc<dyn FlightOfferSource>, settings: QuerySettings) -> Self {
        Self { source, settings }
    }

    /// Build the per-date queries for a search.
    pub fn plan(&self, params: &SearchParams) -> SearchResult<Vec<FlightQuery>> {
        let dates = expand_dates(
            &params.departure_date,
            params.flexible,
            self.settings.flexible_window_days,
        )?;
        let return_date = params.effective_return_date().map(String::from);

        Ok(dates
            .into_iter()
            .map(|date| FlightQuery {
                origin: params.origin.clone(),
                destination: params.destination.clone(),
                departure_date: date,
                return_date: return_date.clone(),
                adults: self.settings.adults,
                currency: self.settings.currency.clone(),
                max_results: self.settings.max_results,
            })
            .collect())
    }

    /// Query every date concurrently and concatenate what came back.
    pub async fn run(&self, params: &SearchParams) -> SearchResult<FanOutOutcome> {
        let queries = self.plan(params)?;
        let started = Instant::now();

        let results = join_all(queries.iter().map(|query| self.source.search_offers(query))).await;

        let mut outcome = FanOutOutcome {
            queried_dates: queries.len(),
            ..Default::default()
        };
        for (query, result) in queries.into_iter().zip(results) {
            match result {
                Ok(offers) => {
                    tracing::debug!(
                        date = %query.departure_date,
                        offers = offers.len(),
                        "Upstream date query succeeded"
                    );
                    metrics::record_upstream_query(true);
                    outcome.offers.extend(offers);
                }
                Err(e) => {
                    tracing::warn!(
                        date = %query.departure_date,
                        error = %e,
                        "Upstream date query failed, contributing no offers"
                    );
                    metrics::record_upstream_query(false);
                    outcome.failed_dates.push(query.departure_date);
                }
            }
        }

        tracing::info!(
            origin = %params.origin,
            destination = %params.destination,
            dates = outcome.queried_dates,
            failed = outcome.failed_dates.len(),
            offers = outcome.offers.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fan-out complete"
        );

        Ok(outcome)
    }

    /// Like `run`, but on a spawned task that outlives the caller.
    pub async fn run_detached(&self, params: SearchParams) -> SearchResult<FanOutOutcome> {
        let fan_out = self.clone();
        let task = async move { fan_out.run(&params).await };
        tokio::spawn(task.instrument(tracing::Span::current()))
            .await
            .map_err(|e| SearchError::TaskFailed(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{UpstreamError, UpstreamResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<FlightQuery>>,
        fail_on: Option<String>,
        panic_on: Option<String>,
        delay: Option<Duration>,
        completed: AtomicUsize,
        spans: Mutex<Vec<Option<tracing::Id>>>,
    }

    #[async_trait]
    impl FlightOfferSource for RecordingSource {
        async fn search_offers(&self, query: &FlightQuery) -> UpstreamResult<Vec<Value>> {
            self.calls.lock().unwrap().push(query.clone());
            self.spans.lock().unwrap().push(tracing::Span::current().id());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.panic_on.as_deref() == Some(query.departure_date.as_str()) {
                panic!("source exploded");
            }
            self.completed.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.as_deref() == Some(query.departure_date.as_str()) {
                return Err(UpstreamError::Status { status: 500, body: "boom".into() });
            }
            Ok(vec![
                json!({ "id": format!("{}-a", query.departure_date) }),
                json!({ "id": format!("{}-b", query.departure_date) }),
            ])
        }
    }

    fn params(flexible: bool, one_way: bool) -> SearchParams {
        SearchParams {
            origin: "PAR".into(),
            destination: "TYO".into(),
            departure_date: "2025-03-10".into(),
            return_date: Some("2025-03-20".into()),
            one_way,
            flexible,
        }
    }

    fn fan_out(source: Arc<RecordingSource>) -> FanOut {
        FanOut::new(source, QuerySettings::default())
    }

    fn ids(outcome: &FanOutOutcome) -> Vec<String> {
        outcome
            .offers
            .iter()
            .map(|o| o["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_fixed_date_issues_single_query() {
        let source = Arc::new(RecordingSource::default());
        let outcome = fan_out(source.clone()).run(&params(false, false)).await.unwrap();

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].departure_date, "2025-03-10");
        assert_eq!(calls[0].return_date.as_deref(), Some("2025-03-20"));
        assert_eq!(calls[0].max_results, 5);
        assert_eq!(outcome.offers.len(), 2);
        assert!(outcome.failed_dates.is_empty());
    }

    #[tokio::test]
    async fn test_flexible_issues_seven_queries() {
        let source = Arc::new(RecordingSource::default());
        let outcome = fan_out(source.clone()).run(&params(true, true)).await.unwrap();

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 7);
        assert!(calls.iter().all(|q| q.return_date.is_none()));
        assert_eq!(outcome.queried_dates, 7);
        assert_eq!(outcome.offers.len(), 14);
    }

    #[tokio::test]
    async fn test_failed_date_is_isolated() {
        let source = Arc::new(RecordingSource {
            fail_on: Some("2025-03-12".into()),
            ..Default::default()
        });
        let outcome = fan_out(source).run(&params(true, false)).await.unwrap();

        assert_eq!(outcome.failed_dates, vec!["2025-03-12".to_string()]);
        assert_eq!(outcome.offers.len(), 12);
        let ids = ids(&outcome);
        assert!(!ids.iter().any(|id| id.starts_with("2025-03-12")));
        assert_eq!(ids[0], "2025-03-10-a");
        assert_eq!(ids[1], "2025-03-10-b");
    }

    #[tokio::test]
    async fn test_every_date_failing_is_still_ok() {
        let source = Arc::new(RecordingSource {
            fail_on: Some("2025-03-10".into()),
            ..Default::default()
        });
        let outcome = fan_out(source).run(&params(false, false)).await.unwrap();
        assert!(outcome.offers.is_empty());
        assert_eq!(outcome.failed_dates.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_flexible_date_issues_nothing() {
        let source = Arc::new(RecordingSource::default());
        let mut p = params(true, false);
        p.departure_date = "10/03/2025".into();

        let err = fan_out(source.clone()).run(&p).await.unwrap_err();
        assert!(matches!(err, SearchError::InvalidDate { .. }));
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported() {
        let source = Arc::new(RecordingSource {
            panic_on: Some("2025-03-10".into()),
            ..Default::default()
        });
        let err = fan_out(source).run_detached(params(false, false)).await.unwrap_err();
        assert!(matches!(err, SearchError::TaskFailed(_)));
    }

    #[tokio::test]
    async fn test_detached_run_survives_caller_drop() {
        let source = Arc::new(RecordingSource {
            delay: Some(Duration::from_millis(100)),
            ..Default::default()
        });
        let fan_out = fan_out(source.clone());

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            fan_out.run_detached(params(true, false)),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(source.completed.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_detached_run_keeps_request_span() {
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry());
        let source = Arc::new(RecordingSource::default());
        let span = tracing::info_span!("request", request_id = "req-1");
        let expected = span.id();

        fan_out(source.clone())
            .run_detached(params(true, true))
            .instrument(span)
            .await
            .unwrap();

        assert!(expected.is_some());
        let spans = source.spans.lock().unwrap();
        assert_eq!(spans.len(), 7);
        assert!(spans.iter().all(|id| *id == expected));
    }
}
