//! Derived carbon indicators.
//!
//! All ratios are computed against total production and forced to zero
//! when the total is zero, so the document never receives a NaN.
//! Production entries that are not numbers (`null` included) count as zero.

use serde::Serialize;
use serde_json::{json, Map, Value};

use grid_common::RenewableSet;

/// Production key holding nuclear output.
const NUCLEAR: &str = "nuclear";

/// Indicators computed from one production mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedIndicators {
    pub total_production: f64,
    pub renewable_production: f64,
    pub nuclear_production: f64,
    pub renewable_ratio: f64,
    pub low_carbon_ratio: f64,
    pub fossil_ratio: f64,
    pub carbon_intensity: f64,
}

impl DerivedIndicators {
    /// Write the indicator fields into a snapshot record.
    ///
    /// Each ratio lands in two fields holding the same value; consumers
    /// read either name.
    pub fn write_to(&self, record: &mut Map<String, Value>) {
        let fields = [
            ("totalProduction", self.total_production),
            ("renewableRatio", self.renewable_ratio),
            ("renewableRatioProduction", self.renewable_ratio),
            ("fossilFuelRatio", self.fossil_ratio),
            ("fossilFuelRatioProduction", self.fossil_ratio),
            ("co2intensity", self.carbon_intensity),
            ("co2intensityProduction", self.carbon_intensity),
        ];
        for (name, value) in fields {
            record.insert(name.to_string(), json!(finite_or_zero(value)));
        }
    }
}

/// Computes [`DerivedIndicators`] with a fixed renewable set and calibration.
#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    renewables: RenewableSet,
    calibration_constant: f64,
}

impl IndicatorCalculator {
    pub fn new(renewables: RenewableSet, calibration_constant: f64) -> Self {
        Self {
            renewables,
            calibration_constant,
        }
    }

    pub fn compute(&self, production: &Map<String, Value>) -> DerivedIndicators {
        let mut total = 0.0;
        let mut renewable = 0.0;
        for (source, value) in production {
            let value = numeric(value);
            total += value;
            if self.renewables.contains(source) {
                renewable += value;
            }
        }
        let nuclear = production.get(NUCLEAR).map(numeric).unwrap_or(0.0);

        if total == 0.0 || !total.is_finite() {
            return DerivedIndicators {
                total_production: finite_or_zero(total),
                renewable_production: finite_or_zero(renewable),
                nuclear_production: finite_or_zero(nuclear),
                ..DerivedIndicators::default()
            };
        }

        let renewable_ratio = renewable / total;
        let low_carbon_ratio = (renewable + nuclear) / total;

        DerivedIndicators {
            total_production: total,
            renewable_production: renewable,
            nuclear_production: nuclear,
            renewable_ratio: finite_or_zero(renewable_ratio),
            low_carbon_ratio: finite_or_zero(low_carbon_ratio),
            fossil_ratio: finite_or_zero(1.0 - low_carbon_ratio),
            carbon_intensity: finite_or_zero(low_carbon_ratio * self.calibration_constant),
        }
    }
}

fn numeric(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
