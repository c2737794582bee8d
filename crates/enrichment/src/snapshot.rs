//! Snapshot documents and the merge step.
//!
//! A snapshot is an opaque JSON document except for one map of records
//! keyed by timestamp (located by a JSON pointer). The merge overwrites the
//! current record with fetched data and stamps every record with the zone.

use std::path::Path;

use serde_json::{json, Map, Value};
use tracing::debug;

use grid_common::{GridError, GridResult, ZoneIdentifier};

use crate::config::{EnrichmentConfig, RecordSelector};
use crate::indicators::{DerivedIndicators, IndicatorCalculator};
use crate::payload::{ExchangePayload, ProductionPayload};
use crate::resolver::ZoneResolver;

/// A parsed snapshot document.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotDocument {
    root: Value,
}

impl SnapshotDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// Read and parse a template from disk.
    pub async fn load(path: &Path) -> GridResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| GridError::TemplateRead {
                path: path.to_path_buf(),
                source,
            })?;
        let root = serde_json::from_slice(&bytes).map_err(|source| GridError::TemplateParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Compact JSON encoding of the document.
    pub fn to_bytes(&self) -> GridResult<Vec<u8>> {
        Ok(serde_json::to_vec(&self.root)?)
    }

    /// The timestamp-keyed record map.
    pub fn records(&self, pointer: &str) -> GridResult<&Map<String, Value>> {
        self.root
            .pointer(pointer)
            .and_then(Value::as_object)
            .ok_or_else(|| missing_records(pointer))
    }

    pub fn records_mut(&mut self, pointer: &str) -> GridResult<&mut Map<String, Value>> {
        self.root
            .pointer_mut(pointer)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| missing_records(pointer))
    }

    /// Key of the record the selector designates.
    pub fn current_key(&self, pointer: &str, selector: &RecordSelector) -> GridResult<String> {
        let records = self.records(pointer)?;
        match selector {
            RecordSelector::Latest => records.keys().max().cloned().ok_or_else(|| {
                GridError::MalformedTemplate(format!("no records under '{}'", pointer))
            }),
            RecordSelector::Timestamp(key) if records.contains_key(key) => Ok(key.clone()),
            RecordSelector::Timestamp(key) => Err(GridError::MalformedTemplate(format!(
                "record '{}' not found under '{}'",
                key, pointer
            ))),
        }
    }
}

fn missing_records(pointer: &str) -> GridError {
    GridError::MalformedTemplate(format!("'{}' is missing or not an object", pointer))
}

fn record_object<'a>(
    records: &'a mut Map<String, Value>,
    key: &str,
) -> GridResult<&'a mut Map<String, Value>> {
    records
        .get_mut(key)
        .and_then(Value::as_object_mut)
        .ok_or_else(|| GridError::MalformedTemplate(format!("record '{}' is not an object", key)))
}

/// What a merge wrote into the document.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    /// Key of the record that received the fetched data
    pub record_key: String,
    pub indicators: DerivedIndicators,
    /// Exchange entries written after translation
    pub exchanges_written: usize,
    /// Exchange entries dropped for lack of a region mapping
    pub exchanges_dropped: usize,
}

/// Merges fetched payloads into a snapshot document.
#[derive(Debug, Clone)]
pub struct SnapshotMerger {
    calculator: IndicatorCalculator,
    records_pointer: String,
    selector: RecordSelector,
}

impl SnapshotMerger {
    pub fn new(
        calculator: IndicatorCalculator,
        records_pointer: impl Into<String>,
        selector: RecordSelector,
    ) -> Self {
        Self {
            calculator,
            records_pointer: records_pointer.into(),
            selector,
        }
    }

    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self::new(
            IndicatorCalculator::new(
                config.renewable_sources.clone(),
                config.calibration_constant,
            ),
            config.records_pointer.clone(),
            config.current_record.clone(),
        )
    }

    /// Overwrite the current record with the payloads and stamp every record.
    ///
    /// Order matters: production and indicators first, then every record's
    /// exchange is reset and zone key stamped, then translated flows are
    /// written into the current record.
    pub fn merge(
        &self,
        document: &mut SnapshotDocument,
        zone: &ZoneIdentifier,
        production: &ProductionPayload,
        exchange: &ExchangePayload,
        resolver: &ZoneResolver,
    ) -> GridResult<MergeSummary> {
        let record_key = document.current_key(&self.records_pointer, &self.selector)?;
        let records = document.records_mut(&self.records_pointer)?;

        let production_map = production.production();
        let indicators = self.calculator.compute(&production_map);
        {
            let record = record_object(records, &record_key)?;
            record.insert("production".to_string(), Value::Object(production_map));
            record.insert("capacity".to_string(), Value::Object(production.capacity()));
            record.insert("source".to_string(), json!(production.source()));
            indicators.write_to(record);
        }

        for (key, record) in records.iter_mut() {
            let record = record.as_object_mut().ok_or_else(|| {
                GridError::MalformedTemplate(format!("record '{}' is not an object", key))
            })?;
            record.insert("exchange".to_string(), Value::Object(Map::new()));
            record.insert("zoneKey".to_string(), json!(zone.as_str()));
        }

        let mut translated = Map::new();
        let mut dropped = 0;
        for (region_name, flow) in &exchange.flow {
            match resolver.translate(region_name) {
                Some(partner) => {
                    translated.insert(partner.to_string(), flow.clone());
                }
                None => {
                    debug!(zone = %zone, region = %region_name, "Dropping unmapped exchange partner");
                    dropped += 1;
                }
            }
        }
        let exchanges_written = translated.len();
        record_object(records, &record_key)?
            .insert("exchange".to_string(), Value::Object(translated));

        Ok(MergeSummary {
            record_key,
            indicators,
            exchanges_written,
            exchanges_dropped: dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTER: &str = "/data/zoneStates";

    fn template() -> SnapshotDocument {
        SnapshotDocument::new(json!({
            "callerLocation": null,
            "data": {
                "zoneStates": {
                    "2022-12-05T08:00:00Z": {
                        "production": {"coal": 1000.0, "wind": 500.0},
                        "capacity": {"coal": 2000.0},
                        "source": "entsoe.eu",
                        "exchange": {"FR": -300.0, "PL": 120.0},
                        "zoneKey": "DE",
                        "co2intensity": 400.0
                    }
                }
            }
        }))
    }

    fn merger() -> SnapshotMerger {
        SnapshotMerger::from_config(&EnrichmentConfig::default())
    }

    fn resolver() -> ZoneResolver {
        ZoneResolver::from_config(&EnrichmentConfig::default())
    }

    fn zone(s: &str) -> ZoneIdentifier {
        ZoneIdentifier::new(s).unwrap()
    }

    fn production(json_text: &str) -> ProductionPayload {
        serde_json::from_str(json_text).unwrap()
    }

    fn exchange(json_text: &str) -> ExchangePayload {
        serde_json::from_str(json_text).unwrap()
    }

    #[test]
    fn test_current_key_latest_picks_greatest() {
        let doc = SnapshotDocument::new(json!({"data": {"zoneStates": {
            "2022-12-05T07:00:00Z": {}, "2022-12-05T08:00:00Z": {}, "2022-12-05T06:00:00Z": {}
        }}}));
        assert_eq!(
            doc.current_key(POINTER, &RecordSelector::Latest).unwrap(),
            "2022-12-05T08:00:00Z"
        );
    }

    #[test]
    fn test_current_key_missing_timestamp() {
        let doc = template();
        let selector = RecordSelector::Timestamp("2023-01-01T00:00:00Z".to_string());
        assert!(matches!(
            doc.current_key(POINTER, &selector),
            Err(GridError::MalformedTemplate(_))
        ));
    }

    #[test]
    fn test_records_missing() {
        let doc = SnapshotDocument::new(json!({"data": {}}));
        assert!(matches!(doc.records(POINTER), Err(GridError::MalformedTemplate(_))));
    }

    #[test]
    fn test_merge_overwrites_current_record() {
        let mut doc = template();
        let summary = merger()
            .merge(
                &mut doc,
                &zone("CA-QC"),
                &production(
                    r#"{"production": {"hydro": 900, "wind": 100}, "capacity": {"hydro": 1200}, "source": "hydroquebec.com"}"#,
                ),
                &exchange(r#"{"flow": {"Ontario": -250.5, "New Brunswick": 80, "Vermont": 12}}"#),
                &resolver(),
            )
            .unwrap();

        assert_eq!(summary.record_key, "2022-12-05T08:00:00Z");
        assert_eq!(summary.exchanges_written, 2);
        assert_eq!(summary.exchanges_dropped, 1);

        let record = &doc.as_value()["data"]["zoneStates"]["2022-12-05T08:00:00Z"];
        assert_eq!(record["production"], json!({"hydro": 900, "wind": 100}));
        assert_eq!(record["capacity"], json!({"hydro": 1200}));
        assert_eq!(record["source"], "hydroquebec.com");
        assert_eq!(record["zoneKey"], "CA-QC");
        assert_eq!(record["totalProduction"], json!(1000.0));
        assert_eq!(record["renewableRatio"], json!(1.0));
        assert_eq!(record["co2intensity"], json!(1810.0));
        assert_eq!(
            record["exchange"],
            json!({"CA-ON": -250.5, "CA-NB": 80})
        );
        // Fields the merge does not own are left alone.
        assert_eq!(doc.as_value()["callerLocation"], Value::Null);
    }

    #[test]
    fn test_merge_keeps_numbers_as_received() {
        let mut doc = template();
        let summary = merger()
            .merge(
                &mut doc,
                &zone("CA-QC"),
                &production(r#"{"production": {"hydro": 900, "wind": 12.50, "unknown": null}}"#),
                &exchange(r#"{"flow": {"Ontario": -250, "New Brunswick": null}}"#),
                &resolver(),
            )
            .unwrap();
        assert_eq!(summary.exchanges_written, 2);

        let bytes = doc.to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(r#""hydro":900,"#), "{}", text);
        assert!(text.contains(r#""unknown":null"#), "{}", text);
        assert!(text.contains(r#""CA-ON":-250"#), "{}", text);
        assert!(!text.contains(r#""CA-ON":-250.0"#), "{}", text);

        let record = &doc.as_value()["data"]["zoneStates"]["2022-12-05T08:00:00Z"];
        assert_eq!(record["exchange"], json!({"CA-ON": -250, "CA-NB": null}));
        assert_eq!(record["totalProduction"], json!(912.5));
    }

    #[test]
    fn test_merge_with_empty_payloads() {
        let mut doc = template();
        merger()
            .merge(
                &mut doc,
                &zone("CA-YT"),
                &ProductionPayload::default(),
                &ExchangePayload::default(),
                &resolver(),
            )
            .unwrap();

        let record = &doc.as_value()["data"]["zoneStates"]["2022-12-05T08:00:00Z"];
        assert_eq!(record["production"], json!({}));
        assert_eq!(record["capacity"], json!({}));
        assert_eq!(record["source"], "");
        assert_eq!(record["exchange"], json!({}));
        assert_eq!(record["zoneKey"], "CA-YT");
        assert_eq!(record["renewableRatio"], json!(0.0));
        assert_eq!(record["fossilFuelRatio"], json!(0.0));
        assert_eq!(record["co2intensity"], json!(0.0));
    }

    #[test]
    fn test_merge_stamps_every_record() {
        let mut doc = SnapshotDocument::new(json!({"data": {"zoneStates": {
            "2022-12-05T07:00:00Z": {"exchange": {"FR": 1.0}, "zoneKey": "DE"},
            "2022-12-05T08:00:00Z": {"exchange": {"FR": 2.0}, "zoneKey": "DE"}
        }}}));
        merger()
            .merge(
                &mut doc,
                &zone("CA-NS"),
                &ProductionPayload::default(),
                &exchange(r#"{"flow": {"New Brunswick": -40}}"#),
                &resolver(),
            )
            .unwrap();

        let states = &doc.as_value()["data"]["zoneStates"];
        assert_eq!(states["2022-12-05T07:00:00Z"]["zoneKey"], "CA-NS");
        assert_eq!(states["2022-12-05T07:00:00Z"]["exchange"], json!({}));
        assert_eq!(states["2022-12-05T08:00:00Z"]["exchange"], json!({"CA-NB": -40}));
        // Only the current record receives production data.
        assert!(states["2022-12-05T07:00:00Z"].get("production").is_none());
    }

    #[test]
    fn test_merge_rejects_non_object_record() {
        let mut doc = SnapshotDocument::new(json!({"data": {"zoneStates": {
            "2022-12-05T08:00:00Z": 42
        }}}));
        let result = merger().merge(
            &mut doc,
            &zone("CA-QC"),
            &ProductionPayload::default(),
            &ExchangePayload::default(),
            &resolver(),
        );
        assert!(matches!(result, Err(GridError::MalformedTemplate(_))));
    }
}
