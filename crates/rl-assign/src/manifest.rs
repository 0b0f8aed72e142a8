use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rl_core::errors::{ErrorInfo, RlError};
use rl_core::provenance::{RunProvenance, SchemaVersion};
use rl_core::seed::Seed;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assign::{AssignmentOutcome, CellSummary, SamplingMode};
use crate::canonical::stable_hash_string;
use crate::design::Design;
use crate::roster::Roster;
use crate::vocabulary::ConditionVocabulary;

/// Schema of [`RunManifest`] payloads.
pub const MANIFEST_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Structured record of a completed randomization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: SchemaVersion,
    pub provenance: RunProvenance,
    pub design: Design,
    pub vocabulary: ConditionVocabulary,
    pub sampling: SamplingMode,
    /// Number of randomized units.
    pub units: usize,
    /// Units per condition across all cells.
    pub counts: BTreeMap<String, usize>,
    /// Cells in sampling order.
    pub cells: Vec<CellSummary>,
}

impl RunManifest {
    /// Captures the inputs and outcome of a run.
    pub fn build(
        roster: &Roster,
        vocabulary: &ConditionVocabulary,
        design: &Design,
        sampling: SamplingMode,
        seed: Seed,
        outcome: &AssignmentOutcome,
    ) -> Result<Self, RlError> {
        let provenance = RunProvenance {
            roster_hash: stable_hash_string(roster)?,
            assignment_hash: stable_hash_string(&outcome.assignment)?,
            seed: seed.value(),
            created_at: chrono::Utc::now().to_rfc3339(),
            tool_versions: BTreeMap::new(),
        }
        .with_tool("rl-core", rl_core::VERSION)
        .with_tool(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        Ok(Self {
            schema_version: MANIFEST_SCHEMA,
            provenance,
            design: design.clone(),
            vocabulary: vocabulary.clone(),
            sampling,
            units: outcome.assignment.len(),
            counts: outcome.assignment.counts(),
            cells: outcome.cells.clone(),
        })
    }

    /// Writes the manifest as pretty JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), RlError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| RlError::io("manifest-mkdir", parent.display(), err))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            RlError::Serde(ErrorInfo::new("manifest-serialize", err.to_string()))
        })?;
        fs::write(path, json).map_err(|err| RlError::io("manifest-write", path.display(), err))?;
        debug!(path = %path.display(), "manifest written");
        Ok(())
    }

    /// Loads a manifest, rejecting schemas this build cannot read.
    pub fn load(path: &Path) -> Result<Self, RlError> {
        let data = fs::read(path).map_err(|err| RlError::io("manifest-read", path.display(), err))?;
        let manifest: Self = serde_json::from_slice(&data).map_err(|err| {
            RlError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        if !MANIFEST_SCHEMA.reads(&manifest.schema_version) {
            return Err(RlError::Serde(
                ErrorInfo::new("manifest-schema", "unsupported manifest schema version")
                    .with_context("path", path.display().to_string())
                    .with_context("found", manifest.schema_version.to_string())
                    .with_context("supported", MANIFEST_SCHEMA.to_string()),
            ));
        }
        Ok(manifest)
    }
}
