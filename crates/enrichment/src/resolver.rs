//! Zone identifier resolution.
//!
//! Decides whether a zone is eligible for enrichment, extracts the upstream
//! region code from it, and translates upstream region names back into
//! output zone identifiers.

use grid_common::{RegionKeyMap, ZoneIdentifier};

use crate::config::EnrichmentConfig;

/// A zone that qualified for enrichment, with its upstream region code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedZone {
    pub zone: ZoneIdentifier,
    /// Region code used in upstream paths; may be empty for short zones
    pub region: String,
}

/// Resolves composite zone identifiers against the configured prefix.
#[derive(Debug, Clone)]
pub struct ZoneResolver {
    country_prefix: String,
    region_offset: usize,
    region_len: usize,
    regions: RegionKeyMap,
}

impl ZoneResolver {
    pub fn new(
        country_prefix: impl Into<String>,
        region_offset: usize,
        region_len: usize,
        regions: RegionKeyMap,
    ) -> Self {
        Self {
            country_prefix: country_prefix.into(),
            region_offset,
            region_len,
            regions,
        }
    }

    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self::new(
            config.country_prefix.clone(),
            config.region_offset,
            config.region_len,
            config.regions.clone(),
        )
    }

    /// True if the zone's prefix matches the recognised country.
    pub fn qualifies(&self, zone: &ZoneIdentifier) -> bool {
        zone.country_prefix() == Some(self.country_prefix.as_str())
    }

    /// Resolve a zone to its region code, or `None` if it does not qualify.
    pub fn resolve(&self, zone: &ZoneIdentifier) -> Option<ResolvedZone> {
        if !self.qualifies(zone) {
            return None;
        }
        Some(ResolvedZone {
            zone: zone.clone(),
            region: zone.segment_at(self.region_offset, self.region_len).to_string(),
        })
    }

    /// Translate an upstream region name into an output zone identifier.
    pub fn translate(&self, region_name: &str) -> Option<&ZoneIdentifier> {
        self.regions.lookup(region_name)
    }
}
