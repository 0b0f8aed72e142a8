//! Schema version and provenance record written alongside every run.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RlError};

/// `major.minor.patch` version of a persisted payload, serialized as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion {
    /// Bumped when older readers can no longer load the payload.
    pub major: u32,
    /// Bumped for added fields.
    pub minor: u32,
    /// Bumped for fixes that leave the layout alone.
    pub patch: u32,
}

impl SchemaVersion {
    /// Version from its three components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// A reader at `self` can load payloads written at `other`.
    pub fn reads(&self, other: &SchemaVersion) -> bool {
        self.major == other.major && self.minor >= other.minor
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = RlError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            RlError::Serde(
                ErrorInfo::new("schema-version", "expected major.minor.patch")
                    .with_context("input", text),
            )
        };
        let mut parts = text.trim().split('.').map(|part| part.parse::<u32>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) => {
                Ok(Self::new(major, minor, patch))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = RlError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl From<SchemaVersion> for String {
    fn from(version: SchemaVersion) -> Self {
        version.to_string()
    }
}

/// Where a run's output came from and how to recreate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Canonical hash of the roster the run read.
    pub roster_hash: String,
    /// Canonical hash of the unit to condition mapping.
    pub assignment_hash: String,
    /// Committed seed.
    pub seed: u64,
    /// RFC-3339 creation time.
    pub created_at: String,
    /// Crate name to version for every tool that touched the run.
    #[serde(default)]
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Records one tool version.
    pub fn with_tool(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.tool_versions.insert(name.into(), version.into());
        self
    }
}
