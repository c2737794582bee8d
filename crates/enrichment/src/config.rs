//! Enrichment configuration.
//!
//! Every lookup table and constant the pipeline uses lives here and is
//! injected at startup. `EnrichmentConfig::default()` carries the built-in
//! values; a YAML file may override any subset of them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use grid_common::{is_valid_segment, GridError, GridResult, RegionKeyMap, RenewableSet, ZoneIdentifier};

/// Directory under the public root holding per-aggregate snapshot files.
pub const DETAILS_DIR: &str = "v6/details";

/// How the record to overwrite is located inside the template.
///
/// Written in configuration as either `latest` or a literal timestamp key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum RecordSelector {
    /// The record with the greatest timestamp key.
    #[default]
    Latest,
    /// The record stored under exactly this key.
    Timestamp(String),
}

impl From<String> for RecordSelector {
    fn from(value: String) -> Self {
        if value == "latest" {
            RecordSelector::Latest
        } else {
            RecordSelector::Timestamp(value)
        }
    }
}

impl From<RecordSelector> for String {
    fn from(selector: RecordSelector) -> Self {
        match selector {
            RecordSelector::Latest => "latest".to_string(),
            RecordSelector::Timestamp(key) => key,
        }
    }
}

/// Runtime configuration for the enrichment pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Zone served when the requested one has no snapshot file
    pub default_zone: ZoneIdentifier,

    /// Base address of the upstream metrics service
    pub upstream_url: String,

    /// Country prefix that makes a zone eligible for enrichment
    pub country_prefix: String,

    /// Offset of the region code inside the zone identifier
    pub region_offset: usize,

    /// Maximum length of the region code
    pub region_len: usize,

    /// Production sources counted as renewable
    pub renewable_sources: RenewableSet,

    /// Multiplier turning the low-carbon ratio into a CO2 intensity
    pub calibration_constant: f64,

    /// Upstream region name to output zone identifier
    pub regions: RegionKeyMap,

    /// Root of the statically served files
    pub public_dir: PathBuf,

    /// Template snapshot; defaults to the default zone's enriched-aggregate file
    pub template_path: Option<PathBuf>,

    /// Aggregate directory enriched snapshots are written to
    pub enriched_aggregate: String,

    /// JSON pointer to the timestamp-keyed record map
    pub records_pointer: String,

    /// Which record of the template receives the fetched data
    pub current_record: RecordSelector,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            default_zone: ZoneIdentifier::new("DE").expect("built-in default zone is valid"),
            upstream_url: "http://127.0.0.1:8000".to_string(),
            country_prefix: "CA".to_string(),
            region_offset: 3,
            region_len: 2,
            renewable_sources: RenewableSet::default(),
            calibration_constant: 1810.0,
            regions: RegionKeyMap::default(),
            public_dir: PathBuf::from("public"),
            template_path: None,
            enriched_aggregate: "hourly".to_string(),
            records_pointer: "/data/zoneStates".to_string(),
            current_record: RecordSelector::Latest,
        }
    }
}

impl EnrichmentConfig {
    /// Load configuration from a YAML file, filling gaps with defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> GridResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            GridError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), regions = config.regions.len(), "Loaded enrichment config");
        Ok(config)
    }

    /// Parse configuration from YAML text and validate it.
    pub fn from_yaml_str(text: &str) -> GridResult<Self> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> GridResult<()> {
        if self.country_prefix.len() != ZoneIdentifier::PREFIX_LEN
            || !is_valid_segment(&self.country_prefix)
        {
            return Err(GridError::InvalidConfig(format!(
                "country_prefix must be {} ASCII characters, got '{}'",
                ZoneIdentifier::PREFIX_LEN,
                self.country_prefix
            )));
        }
        if self.region_len == 0 {
            return Err(GridError::InvalidConfig("region_len must be at least 1".to_string()));
        }
        if !self.calibration_constant.is_finite() {
            return Err(GridError::InvalidConfig(
                "calibration_constant must be a finite number".to_string(),
            ));
        }
        if !is_valid_segment(&self.enriched_aggregate) {
            return Err(GridError::InvalidConfig(format!(
                "enriched_aggregate '{}' is not a valid path segment",
                self.enriched_aggregate
            )));
        }
        if !self.records_pointer.is_empty() && !self.records_pointer.starts_with('/') {
            return Err(GridError::InvalidConfig(format!(
                "records_pointer '{}' must be empty or start with '/'",
                self.records_pointer
            )));
        }
        reqwest::Url::parse(&self.upstream_url).map_err(|e| {
            GridError::InvalidConfig(format!("upstream_url '{}': {}", self.upstream_url, e))
        })?;
        Ok(())
    }

    /// Directory holding the snapshot files of one aggregate.
    pub fn aggregate_dir(&self, aggregate: &str) -> PathBuf {
        self.public_dir.join(DETAILS_DIR).join(aggregate)
    }

    /// Path of the snapshot file for (aggregate, zone).
    pub fn snapshot_path(&self, aggregate: &str, zone: &ZoneIdentifier) -> PathBuf {
        self.aggregate_dir(aggregate).join(zone.file_name())
    }

    /// Path enriched snapshots for `zone` are written to.
    pub fn enriched_path(&self, zone: &ZoneIdentifier) -> PathBuf {
        self.snapshot_path(&self.enriched_aggregate, zone)
    }

    /// Template document read on every enrichment.
    pub fn template_path(&self) -> PathBuf {
        match &self.template_path {
            Some(path) => path.clone(),
            None => self.enriched_path(&self.default_zone),
        }
    }
}
