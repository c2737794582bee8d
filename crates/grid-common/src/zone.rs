//! Composite zone identifiers.
//!
//! A zone identifier is a country prefix followed by a region suffix, e.g.
//! `CA-QC` or `US-NW-BPAT`. Identifiers double as file names under the
//! public directory, so only ASCII letters, digits, `-` and `_` are accepted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// Returns true if `segment` may be used as a single path component.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// A validated zone identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZoneIdentifier(pub(crate) String);

impl ZoneIdentifier {
    /// Length of the country prefix.
    pub const PREFIX_LEN: usize = 2;

    pub fn new(value: impl Into<String>) -> GridResult<Self> {
        let value = value.into();
        if !is_valid_segment(&value) {
            return Err(GridError::InvalidSegment {
                segment: value,
                message: "zone identifiers may only contain ASCII letters, digits, '-' and '_'"
                    .to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-character country prefix, or `None` for shorter identifiers.
    pub fn country_prefix(&self) -> Option<&str> {
        self.0.get(..Self::PREFIX_LEN)
    }

    /// Substring of at most `len` characters starting at `offset`.
    ///
    /// Identifiers shorter than `offset` yield an empty string.
    pub fn segment_at(&self, offset: usize, len: usize) -> &str {
        let start = offset.min(self.0.len());
        let end = offset.saturating_add(len).min(self.0.len());
        // Identifiers are ASCII-only, every index is a char boundary.
        &self.0[start..end]
    }

    /// File name used for this zone's snapshot (`<zone>.json`).
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

impl fmt::Display for ZoneIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ZoneIdentifier {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ZoneIdentifier> for String {
    fn from(zone: ZoneIdentifier) -> Self {
        zone.0
    }
}

impl AsRef<str> for ZoneIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
