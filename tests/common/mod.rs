//! Shared utilities for integration testing.

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use flight_proxy::{HttpServer, ProxyConfig, Shutdown};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const TEST_TOKEN: &str = "test-token";

type Responder = Arc<dyn Fn(&HashMap<String, String>) -> (u16, Value) + Send + Sync>;

/// Handle on a running mock flight-offer provider.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub offer_calls: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub token_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn offer_call_count(&self) -> usize {
        self.offer_calls.lock().unwrap().len()
    }

    pub fn queried_dates(&self) -> Vec<String> {
        self.offer_calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|q| q.get("departureDate").cloned())
            .collect()
    }
}

#[derive(Clone)]
struct MockState {
    token_status: u16,
    responder: Responder,
    offer_calls: Arc<Mutex<Vec<HashMap<String, String>>>>,
    token_calls: Arc<AtomicUsize>,
}

async fn token(State(state): State<MockState>) -> (StatusCode, Json<Value>) {
    state.token_calls.fetch_add(1, Ordering::SeqCst);
    let status = StatusCode::from_u16(state.token_status).unwrap();
    if status.is_success() {
        (
            status,
            Json(json!({
                "type": "amadeusOAuth2Token",
                "access_token": TEST_TOKEN,
                "expires_in": 1799
            })),
        )
    } else {
        (status, Json(json!({ "error": "invalid_client" })))
    }
}

async fn offers(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {}", TEST_TOKEN);
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "errors": [{ "status": 401 }] })));
    }

    state.offer_calls.lock().unwrap().push(query.clone());
    let (status, body) = (state.responder)(&query);
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

/// Start a programmable mock provider.
///
/// `responder` sees the offer-search query parameters and returns the
/// status and JSON body to answer with.
pub async fn start_mock_upstream<F>(token_status: u16, responder: F) -> MockUpstream
where
    F: Fn(&HashMap<String, String>) -> (u16, Value) + Send + Sync + 'static,
{
    let offer_calls = Arc::new(Mutex::new(Vec::new()));
    let token_calls = Arc::new(AtomicUsize::new(0));

    let state = MockState {
        token_status,
        responder: Arc::new(responder),
        offer_calls: offer_calls.clone(),
        token_calls: token_calls.clone(),
    };

    let app = Router::new()
        .route("/v1/security/oauth2/token", post(token))
        .route("/v2/shopping/flight-offers", get(offers))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream {
        addr,
        offer_calls,
        token_calls,
    }
}

/// Start the proxy pointed at `upstream`.
pub async fn start_proxy(upstream: &MockUpstream) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{}", upstream.addr);
    config.upstream.client_id = "test-id".into();
    config.upstream.client_secret = "test-secret".into();
    config.upstream.timeout_secs = 5;

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::from_config(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn segment(from: &str, dep: &str, to: &str, arr: &str, carrier: &str, number: &str) -> Value {
    json!({
        "departure": { "iataCode": from, "at": dep },
        "arrival": { "iataCode": to, "at": arr },
        "carrierCode": carrier,
        "number": number,
        "numberOfStops": 0
    })
}

/// A one-stop CDG → FRA → HND offer departing on `date`.
pub fn offer_for(date: &str) -> Value {
    json!({
        "type": "flight-offer",
        "id": format!("{}-1", date),
        "source": "GDS",
        "itineraries": [{
            "duration": "PT16H5M",
            "segments": [
                segment("CDG", &format!("{}T10:30:00", date), "FRA", &format!("{}T11:45:00", date), "LH", "1029"),
                segment("FRA", &format!("{}T13:30:00", date), "HND", &format!("{}T23:35:00", date), "LH", "716")
            ]
        }],
        "price": { "currency": "EUR", "total": "812.40", "base": "640.00" }
    })
}

/// Wrap offers the way the provider does.
pub fn envelope(offers: Vec<Value>) -> Value {
    let count = offers.len();
    json!({ "meta": { "count": count }, "data": offers })
}
