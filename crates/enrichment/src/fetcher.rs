//! Upstream metrics fetching.
//!
//! Both fetches swallow their failures: a network error, a non-success
//! status or an undecodable body is logged and reported to the caller as
//! an empty payload. No retries and no timeout beyond the client default.

use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use grid_common::{GridError, GridResult};

use crate::payload::{ExchangePayload, ProductionPayload};

/// Source of production and exchange data for a region.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Production mix for a region; empty on any failure.
    async fn fetch_production(&self, region: &str) -> ProductionPayload;

    /// Exchange flows for a region; empty on any failure.
    async fn fetch_exchange(&self, region: &str) -> ExchangePayload;
}

/// Reasons a single upstream request produced no payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Metrics source backed by the upstream HTTP service.
pub struct HttpMetricsSource {
    client: Client,
    base_url: String,
}

impl HttpMetricsSource {
    pub fn new(base_url: impl Into<String>) -> GridResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| GridError::InternalError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn production_url(&self, region: &str) -> String {
        format!("{}/province/{}/production", self.base_url, region)
    }

    pub fn exchange_url(&self, region: &str) -> String {
        format!("{}/province/{}/exchange", self.base_url, region)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch `url` unless the region is empty, degrading failures to `T::default()`.
    async fn fetch_or_default<T>(&self, kind: &'static str, region: &str, url: String) -> T
    where
        T: DeserializeOwned + Default,
    {
        if region.is_empty() {
            debug!(kind, "Empty region code, skipping upstream request");
            return T::default();
        }

        debug!(kind, url = %url, "Fetching upstream metrics");
        match self.get_json(&url).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(kind, url = %url, error = %e, "Upstream fetch failed, using empty payload");
                counter!("mockserver_upstream_failures_total", "kind" => kind).increment(1);
                T::default()
            }
        }
    }
}

#[async_trait]
impl MetricsSource for HttpMetricsSource {
    #[instrument(skip(self))]
    async fn fetch_production(&self, region: &str) -> ProductionPayload {
        let url = self.production_url(region);
        self.fetch_or_default("production", region, url).await
    }

    #[instrument(skip(self))]
    async fn fetch_exchange(&self, region: &str) -> ExchangePayload {
        let url = self.exchange_url(region);
        self.fetch_or_default("exchange", region, url).await
    }
}
