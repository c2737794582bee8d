//! Mapping from upstream region names to output zone identifiers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::zone::ZoneIdentifier;

/// Built-in region table used when no configuration overrides it.
const DEFAULT_REGIONS: &[(&str, &str)] = &[
    ("Newfoundland", "CA-NL-LB"),
    ("Labrador", "CA-NL-NF"),
    ("New Brunswick", "CA-NB"),
    ("Nova Scotia", "CA-NS"),
    ("Prince Edward Island", "CA-PE"),
    ("Quebec", "CA-QC"),
    ("Ontario", "CA-ON"),
    ("Manitoba", "CA-MB"),
    ("Saskatchewan", "CA-SK"),
    ("Alberta", "CA-AB"),
    ("British Columbia", "CA-BC"),
    ("Yukon Territory", "CA-YT"),
    ("Northwest Territories", "CA-NT"),
    ("Nunavut", "CA-NU"),
    ("Montana", "US-NW-BPAT"),
];

/// Immutable region name to zone identifier table.
///
/// Each identifier appears at most once: two region names can never
/// collapse onto the same exchange key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct RegionKeyMap {
    entries: BTreeMap<String, ZoneIdentifier>,
}

impl RegionKeyMap {
    /// Build a map from (region name, zone identifier) pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> GridResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = BTreeMap::new();
        let mut seen = BTreeSet::new();

        for (name, zone) in pairs {
            let name = name.into();
            let zone = ZoneIdentifier::new(zone).map_err(|e| {
                GridError::InvalidConfig(format!("region '{}': {}", name, e))
            })?;

            if !seen.insert(zone.clone()) {
                return Err(GridError::InvalidConfig(format!(
                    "zone '{}' is mapped from more than one region",
                    zone
                )));
            }
            if entries.insert(name.clone(), zone).is_some() {
                return Err(GridError::InvalidConfig(format!(
                    "region '{}' is listed twice",
                    name
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Translate an upstream region name. Unknown names map to `None`.
    pub fn lookup(&self, region_name: &str) -> Option<&ZoneIdentifier> {
        self.entries.get(region_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ZoneIdentifier)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for RegionKeyMap {
    fn default() -> Self {
        let entries = DEFAULT_REGIONS
            .iter()
            .map(|(name, zone)| {
                (
                    (*name).to_string(),
                    ZoneIdentifier(String::from(*zone)),
                )
            })
            .collect();
        Self { entries }
    }
}

impl TryFrom<BTreeMap<String, String>> for RegionKeyMap {
    type Error = GridError;

    fn try_from(value: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_pairs(value)
    }
}

impl From<RegionKeyMap> for BTreeMap<String, String> {
    fn from(map: RegionKeyMap) -> Self {
        map.entries
            .into_iter()
            .map(|(k, v)| (k, String::from(v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let map = RegionKeyMap::default();
        assert_eq!(map.len(), 15);
        assert_eq!(map.lookup("Quebec").map(|z| z.as_str()), Some("CA-QC"));
        assert_eq!(map.lookup("Montana").map(|z| z.as_str()), Some("US-NW-BPAT"));
        assert_eq!(map.lookup("Newfoundland").map(|z| z.as_str()), Some("CA-NL-LB"));
    }

    #[test]
    fn test_default_table_is_valid() {
        // Same table through the validating constructor.
        let rebuilt = RegionKeyMap::from_pairs(DEFAULT_REGIONS.iter().copied()).unwrap();
        assert_eq!(rebuilt, RegionKeyMap::default());
    }

    #[test]
    fn test_unknown_region() {
        assert!(RegionKeyMap::default().lookup("Atlantis").is_none());
        assert!(RegionKeyMap::default().lookup("quebec").is_none());
    }

    #[test]
    fn test_rejects_many_to_one() {
        let result = RegionKeyMap::from_pairs([("Quebec", "CA-QC"), ("Québec", "CA-QC")]);
        assert!(matches!(result, Err(GridError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_invalid_zone() {
        let result = RegionKeyMap::from_pairs([("Quebec", "CA/QC")]);
        assert!(matches!(result, Err(GridError::InvalidConfig(_))));
    }
}
