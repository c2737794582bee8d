//! The enrichment pipeline for one zone.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{info, instrument};

use grid_common::{GridResult, ZoneIdentifier};

use crate::config::EnrichmentConfig;
use crate::fetcher::MetricsSource;
use crate::indicators::DerivedIndicators;
use crate::resolver::{ResolvedZone, ZoneResolver};
use crate::snapshot::{SnapshotDocument, SnapshotMerger};
use crate::writer::SnapshotWriter;

/// Result of enriching one zone.
#[derive(Debug, Clone)]
pub struct EnrichmentOutcome {
    pub zone: ZoneIdentifier,
    /// Upstream region code the data was fetched for
    pub region: String,
    /// Snapshot file that was written
    pub path: PathBuf,
    pub indicators: DerivedIndicators,
    pub exchanges_written: usize,
}

/// Resolve, fetch, merge and persist a zone snapshot.
///
/// The template is re-read on every call and nothing is cached between
/// calls; the snapshot file on disk is the only output.
pub struct EnrichmentPipeline {
    config: Arc<EnrichmentConfig>,
    resolver: ZoneResolver,
    merger: SnapshotMerger,
    source: Arc<dyn MetricsSource>,
    writer: SnapshotWriter,
}

impl EnrichmentPipeline {
    pub fn new(config: Arc<EnrichmentConfig>, source: Arc<dyn MetricsSource>) -> Self {
        Self {
            resolver: ZoneResolver::from_config(&config),
            merger: SnapshotMerger::from_config(&config),
            config,
            source,
            writer: SnapshotWriter::new(),
        }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ZoneResolver {
        &self.resolver
    }

    /// True if requests for `zone` trigger enrichment.
    pub fn qualifies(&self, zone: &ZoneIdentifier) -> bool {
        self.resolver.qualifies(zone)
    }

    /// Enrich `zone` if it qualifies. Returns `Ok(None)` for other zones.
    ///
    /// Upstream failures degrade to empty data; template and write
    /// failures are returned as errors.
    #[instrument(skip(self), fields(zone = %zone))]
    pub async fn enrich(&self, zone: &ZoneIdentifier) -> GridResult<Option<EnrichmentOutcome>> {
        let Some(resolved) = self.resolver.resolve(zone) else {
            return Ok(None);
        };
        self.run(resolved).await.map(Some)
    }

    async fn run(&self, resolved: ResolvedZone) -> GridResult<EnrichmentOutcome> {
        let start = Instant::now();
        let ResolvedZone { zone, region } = resolved;
        let _guard = self.writer.lock(&zone).await;

        let mut document = SnapshotDocument::load(&self.config.template_path()).await?;

        // Exchange is requested only after production has completed.
        let production = self.source.fetch_production(&region).await;
        let exchange = self.source.fetch_exchange(&region).await;

        let summary = self
            .merger
            .merge(&mut document, &zone, &production, &exchange, &self.resolver)?;

        let path = self.config.enriched_path(&zone);
        self.writer.write(&path, &document).await?;

        counter!("mockserver_enrichments_total").increment(1);
        histogram!("mockserver_enrichment_duration_seconds").record(start.elapsed().as_secs_f64());

        info!(
            zone = %zone,
            region = %region,
            record = %summary.record_key,
            total_production = summary.indicators.total_production,
            co2intensity = summary.indicators.carbon_intensity,
            exchanges = summary.exchanges_written,
            dropped_exchanges = summary.exchanges_dropped,
            "Enriched zone snapshot"
        );

        Ok(EnrichmentOutcome {
            zone,
            region,
            path,
            indicators: summary.indicators,
            exchanges_written: summary.exchanges_written,
        })
    }
}
