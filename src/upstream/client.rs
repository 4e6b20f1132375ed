//! Amadeus flight-offer client.
//!
//! # Responsibilities
//! - Exchange client credentials for a bearer token and reuse it until expiry
//! - Issue single-date flight-offer searches
//! - Surface transport, status and payload problems as `UpstreamError`

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::UpstreamConfig;
use crate::upstream::types::{FlightOfferSource, FlightQuery, UpstreamError, UpstreamResult};

const TOKEN_PATH: &str = "v1/security/oauth2/token";
const OFFERS_PATH: &str = "v2/shopping/flight-offers";

/// Refresh this long before the provider's stated expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct OffersEnvelope {
    data: Vec<Value>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN < self.expires_at
    }
}

/// HTTP client for the Amadeus Self-Service API.
pub struct AmadeusClient {
    http: reqwest::Client,
    token_url: url::Url,
    offers_url: url::Url,
    client_id: String,
    client_secret: String,
    token: RwLock<Option<AccessToken>>,
}

impl AmadeusClient {
    /// Build a client from configuration. Does not contact the provider.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let mut base = url::Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::Config(format!("base_url '{}': {}", config.base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let token_url = base
            .join(TOKEN_PATH)
            .map_err(|e| UpstreamError::Config(e.to_string()))?;
        let offers_url = base
            .join(OFFERS_PATH)
            .map_err(|e| UpstreamError::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            token_url,
            offers_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: RwLock::new(None),
        })
    }

    async fn access_token(&self) -> UpstreamResult<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }

        let mut slot = self.token.write().await;
        // Another sub-query may have refreshed while we waited.
        if let Some(token) = slot.as_ref() {
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Auth(format!("status {}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Auth(format!("malformed token response: {}", e)))?;

        tracing::debug!(expires_in = token.expires_in, "Obtained upstream access token");

        let value = token.access_token.clone();
        *slot = Some(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }
}

#[async_trait]
impl FlightOfferSource for AmadeusClient {
    async fn search_offers(&self, query: &FlightQuery) -> UpstreamResult<Vec<Value>> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.offers_url.clone())
            .bearer_auth(token)
            .query(&query.to_params())
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: OffersEnvelope = response
            .json()
            .await
            .map_err(|e| UpstreamError::Payload(e.to_string()))?;

        Ok(envelope.data)
    }
}

impl std::fmt::Debug for AmadeusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmadeusClient")
            .field("offers_url", &self.offers_url.as_str())
            .field("client_id", &self.client_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_onto_base_path() {
        let mut config = UpstreamConfig::default();
        config.base_url = "http://127.0.0.1:9000/amadeus".into();
        let client = AmadeusClient::new(&config).unwrap();

        assert_eq!(client.token_url.as_str(), "http://127.0.0.1:9000/amadeus/v1/security/oauth2/token");
        assert_eq!(client.offers_url.as_str(), "http://127.0.0.1:9000/amadeus/v2/shopping/flight-offers");
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = UpstreamConfig::default();
        config.base_url = "::not a url::".into();
        let err = AmadeusClient::new(&config).unwrap_err();
        assert!(matches!(err, UpstreamError::Config(_)));
    }

    #[test]
    fn test_debug_hides_secret() {
        let mut config = UpstreamConfig::default();
        config.client_secret = "top-secret".into();
        let client = AmadeusClient::new(&config).unwrap();
        assert!(!format!("{:?}", client).contains("top-secret"));
    }

    #[test]
    fn test_token_freshness() {
        let stale = AccessToken {
            value: "t".into(),
            expires_at: Instant::now() + Duration::from_secs(5),
        };
        assert!(!stale.is_fresh());

        let fresh = AccessToken {
            value: "t".into(),
            expires_at: Instant::now() + Duration::from_secs(1799),
        };
        assert!(fresh.is_fresh());
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let mut config = UpstreamConfig::default();
        config.base_url = "http://127.0.0.1:1".into();
        config.timeout_secs = 2;
        let client = AmadeusClient::new(&config).unwrap();

        let query = FlightQuery {
            origin: "PAR".into(),
            destination: "TYO".into(),
            departure_date: "2025-03-10".into(),
            return_date: None,
            adults: 1,
            currency: "EUR".into(),
            max_results: 5,
        };
        assert!(client.search_offers(&query).await.is_err());
    }
}
