//! Tests for loading the injected lookup tables from configuration text.

use grid_common::{GridError, RegionKeyMap, RenewableSet, ZoneIdentifier};

// ============================================================================
// RegionKeyMap deserialization
// ============================================================================

#[test]
fn test_region_map_from_yaml() {
    let yaml = r#"
Quebec: CA-QC
Ontario: CA-ON
"New Brunswick": CA-NB
"#;
    let map: RegionKeyMap = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map.lookup("New Brunswick").map(ZoneIdentifier::as_str), Some("CA-NB"));
    assert!(map.lookup("Alberta").is_none());
}

#[test]
fn test_region_map_yaml_rejects_duplicate_targets() {
    let yaml = r#"
Quebec: CA-QC
Montreal: CA-QC
"#;
    let result: Result<RegionKeyMap, _> = serde_yaml::from_str(yaml);
    let err = result.unwrap_err().to_string();
    assert!(err.contains("CA-QC"), "unexpected error: {err}");
}

#[test]
fn test_region_map_json_roundtrip_keeps_entries() {
    let map = RegionKeyMap::default();
    let json = serde_json::to_value(&map).unwrap();
    assert_eq!(json["Alberta"], "CA-AB");
    assert_eq!(json["Labrador"], "CA-NL-NF");
}

#[test]
fn test_region_map_invalid_target_is_config_error() {
    let err = RegionKeyMap::from_pairs([("Quebec", "")]).unwrap_err();
    assert!(matches!(err, GridError::InvalidConfig(_)));
}

// ============================================================================
// RenewableSet deserialization
// ============================================================================

#[test]
fn test_renewable_set_from_yaml_list() {
    let set: RenewableSet = serde_yaml::from_str("[hydro, wind, geothermal]").unwrap();
    assert!(set.contains("geothermal"));
    assert!(set.contains("hydro"));
    assert!(!set.contains("solar"));
}
