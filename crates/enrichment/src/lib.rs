//! Zone snapshot enrichment.
//!
//! Given a composite zone identifier, fetches the live production mix and
//! exchange flows for its region, derives carbon-intensity indicators and
//! merges everything into a copy of the template snapshot, which is then
//! persisted for static serving.
//!
//! # Architecture
//!
//! - [`resolver`]: zone identifier to upstream region, region name to zone
//! - [`fetcher`]: upstream production/exchange requests, empty on failure
//! - [`indicators`]: total, renewable, low-carbon, fossil and CO2 figures
//! - [`snapshot`]: template document access and the merge step
//! - [`writer`]: per-zone single-writer, atomic snapshot persistence
//! - [`pipeline`]: sequences the above for one request

pub mod config;
pub mod fetcher;
pub mod indicators;
pub mod payload;
pub mod pipeline;
pub mod resolver;
pub mod snapshot;
pub mod writer;

// Re-exports
pub use config::{EnrichmentConfig, RecordSelector, DETAILS_DIR};
pub use fetcher::{FetchError, HttpMetricsSource, MetricsSource};
pub use indicators::{DerivedIndicators, IndicatorCalculator};
pub use payload::{ExchangePayload, ProductionPayload};
pub use pipeline::{EnrichmentOutcome, EnrichmentPipeline};
pub use resolver::{ResolvedZone, ZoneResolver};
pub use snapshot::{MergeSummary, SnapshotDocument, SnapshotMerger};
pub use writer::SnapshotWriter;
