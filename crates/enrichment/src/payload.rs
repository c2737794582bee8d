//! Upstream payload shapes.
//!
//! Only presence is checked: every field is optional and a missing field
//! behaves like an empty one. Map values are kept as raw JSON so one
//! non-numeric entry never costs the rest of the response, and numbers are
//! written back exactly as received.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `GET <base>/province/<region>/production`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionPayload {
    /// Output per source. `null` marks a source with unknown output.
    #[serde(default)]
    pub production: Option<Map<String, Value>>,

    /// Installed capacity per source, copied through untouched
    #[serde(default)]
    pub capacity: Option<Map<String, Value>>,

    /// Human-readable data source label
    #[serde(default)]
    pub source: Option<String>,
}

impl ProductionPayload {
    /// Production mapping, empty if absent.
    pub fn production(&self) -> Map<String, Value> {
        self.production.clone().unwrap_or_default()
    }

    /// Capacity mapping, empty if absent.
    pub fn capacity(&self) -> Map<String, Value> {
        self.capacity.clone().unwrap_or_default()
    }

    /// Source label, empty if absent.
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or("")
    }
}

/// Response of `GET <base>/province/<region>/exchange`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangePayload {
    /// Flow per neighbouring region name, sign as reported upstream
    #[serde(default)]
    pub flow: Map<String, Value>,
}
