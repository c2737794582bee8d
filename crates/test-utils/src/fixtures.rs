//! Common test fixtures for snapshot enrichment tests.

use serde_json::{json, Value};

/// Timestamp key of the single record in [`template_document`].
pub const TEMPLATE_TIMESTAMP: &str = "2022-12-05T08:00:00Z";

/// A reduced copy of the default zone's hourly snapshot.
pub fn template_document() -> Value {
    json!({
        "_disclaimer": "This data is the exclusive property of the data provider.",
        "callerLocation": null,
        "data": {
            "hasData": true,
            "hasParser": true,
            "stateAggregation": "hourly",
            "zoneStates": {
                TEMPLATE_TIMESTAMP: {
                    "capacity": {"coal": 38400.0, "gas": 31700.0, "wind": 64000.0},
                    "co2intensity": 464.43,
                    "co2intensityProduction": 470.12,
                    "exchange": {"AT": -1370.0, "FR": 2250.0, "PL": -340.0},
                    "fossilFuelRatio": 0.58,
                    "fossilFuelRatioProduction": 0.59,
                    "isValid": true,
                    "production": {"coal": 21000.0, "gas": 9800.0, "nuclear": 3900.0, "wind": 12700.0},
                    "renewableRatio": 0.34,
                    "renewableRatioProduction": 0.33,
                    "source": "entsoe.eu",
                    "stateDatetime": TEMPLATE_TIMESTAMP,
                    "totalProduction": 47400.0,
                    "zoneKey": "DE"
                }
            },
            "zoneMessage": null
        }
    })
}

/// Production response for a mostly hydro province.
pub fn quebec_production() -> Value {
    json!({
        "zoneKey": "CA-QC",
        "production": {"hydro": 30000.0, "wind": 3000.0, "biomass": 500.0, "solar": 0.0, "unknown": 6500.0},
        "capacity": {"hydro": 37000.0, "wind": 3900.0},
        "source": "hydroquebec.com"
    })
}

/// Exchange response with mapped and unmapped neighbours.
pub fn quebec_exchange() -> Value {
    json!({
        "flow": {"Ontario": -1450.0, "New Brunswick": 620.0, "New York": -1800.0}
    })
}

/// Production response with nuclear output.
pub fn new_brunswick_production() -> Value {
    json!({
        "production": {"nuclear": 30.0, "wind": 20.0, "coal": 50.0},
        "source": "tso.nbpower.com"
    })
}
