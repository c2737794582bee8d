//! Application state shared across handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use enrichment::{EnrichmentConfig, EnrichmentPipeline, HttpMetricsSource, MetricsSource};
use grid_common::GridResult;

/// Shared state for the HTTP server.
pub struct AppState {
    pub config: Arc<EnrichmentConfig>,
    pub pipeline: Arc<EnrichmentPipeline>,
    /// Present when a Prometheus recorder is installed
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state talking to the configured upstream over HTTP.
    pub fn new(config: EnrichmentConfig) -> GridResult<Self> {
        let source = HttpMetricsSource::new(config.upstream_url.clone())?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Build state around any metrics source.
    pub fn with_source(config: EnrichmentConfig, source: Arc<dyn MetricsSource>) -> Self {
        let config = Arc::new(config);
        let pipeline = Arc::new(EnrichmentPipeline::new(config.clone(), source));
        Self {
            config,
            pipeline,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
