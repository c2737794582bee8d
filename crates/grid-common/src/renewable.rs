//! The set of production sources counted as renewable.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Production source names treated as renewable for ratio purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenewableSet(BTreeSet<String>);

impl RenewableSet {
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(sources.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.0.contains(source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for RenewableSet {
    fn default() -> Self {
        Self::new(["biomass", "hydro", "solar", "wind"])
    }
}
