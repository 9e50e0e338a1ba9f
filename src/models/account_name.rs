//! Hierarchical account names
//!
//! An account is addressed by a dotted path such as `Assets.Bank.Savings`.
//! The first segment is the top-level group; deeper segments are
//! sub-accounts used for grouping and roll-up.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{WimmError, WimmResult};

/// Separator between account name segments
pub const SEPARATOR: char = '.';

/// Account used when no better destination is known
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A dotted, case-sensitive account path
///
/// Ordering and equality work on the segment sequence, so `Assets.Bank`
/// sorts directly after `Assets`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountName {
    segments: Vec<String>,
}

impl AccountName {
    /// Parse an account name, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is empty or contains an
    /// empty segment (`Assets..Bank`, `.Assets`).
    pub fn parse(raw: &str) -> WimmResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WimmError::Validation("Account name cannot be empty".into()));
        }

        let segments: Vec<String> = trimmed.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(WimmError::Validation(format!(
                "Account name '{}' contains an empty segment",
                trimmed
            )));
        }

        Ok(Self { segments })
    }

    /// The `Uncategorized` fallback account
    pub fn uncategorized() -> Self {
        Self {
            segments: vec![UNCATEGORIZED.to_string()],
        }
    }

    /// The path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments (`Assets.Bank` has depth 2)
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Keep only the first `depth` segments
    ///
    /// A depth of 0 is treated as 1 so the result is always a valid name.
    pub fn truncate(&self, depth: usize) -> Self {
        let depth = depth.max(1).min(self.depth());
        Self {
            segments: self.segments[..depth].to_vec(),
        }
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.segments.join("."))
    }
}

impl FromStr for AccountName {
    type Err = WimmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AccountName {
    type Error = WimmError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountName {
    type Error = WimmError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl Serialize for AccountName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
