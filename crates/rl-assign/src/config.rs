use std::fs;
use std::path::{Path, PathBuf};

use rl_core::errors::{ErrorInfo, RlError};
use rl_core::seed::SeedPolicy;
use serde::{Deserialize, Serialize};

use crate::assign::SamplingMode;
use crate::design::Design;
use crate::vocabulary::ConditionVocabulary;

/// YAML-configurable parameters governing a randomization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Identity, block and stratification columns.
    #[serde(default)]
    pub design: Design,
    /// Treatment arms excluding control.
    #[serde(default = "default_treatment_arms")]
    pub treatment_arms: i64,
    /// Explicit condition labels; overrides `treatment_arms` when set.
    #[serde(default)]
    pub conditions: Option<ConditionVocabulary>,
    /// Random stream layout.
    #[serde(default)]
    pub sampling: SamplingMode,
    /// Seed value and acceptance policy.
    #[serde(default)]
    pub seed_policy: SeedConfig,
    /// Output file layout.
    #[serde(default)]
    pub output: OutputConfig,
    /// Label sheet contents.
    #[serde(default)]
    pub labels: LabelConfig,
}

fn default_treatment_arms() -> i64 {
    1
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            design: Design::default(),
            treatment_arms: default_treatment_arms(),
            conditions: None,
            sampling: SamplingMode::default(),
            seed_policy: SeedConfig::default(),
            output: OutputConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

impl RunConfig {
    /// Reads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, RlError> {
        let bytes = fs::read(path).map_err(|err| {
            RlError::Io(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_yaml::from_slice(&bytes).map_err(|err| {
            RlError::Serde(
                ErrorInfo::new("config-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Vocabulary from explicit labels or the arm count.
    pub fn vocabulary(&self) -> Result<ConditionVocabulary, RlError> {
        match &self.conditions {
            Some(vocabulary) => Ok(vocabulary.clone()),
            None => ConditionVocabulary::for_arms(self.treatment_arms),
        }
    }
}

/// Seed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Fixed seed; a fresh one is generated when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub policy: SeedPolicy,
}

/// Output file layout, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_assignment_file")]
    pub assignment_file: PathBuf,
    #[serde(default = "default_seed_file")]
    pub seed_file: PathBuf,
    #[serde(default = "default_manifest_file")]
    pub manifest_file: PathBuf,
    /// Label sheets are written as `<prefix><condition>.txt`.
    #[serde(default = "default_label_prefix")]
    pub label_prefix: String,
}

fn default_assignment_file() -> PathBuf {
    PathBuf::from("assignment.csv")
}

fn default_seed_file() -> PathBuf {
    PathBuf::from("seed.txt")
}

fn default_manifest_file() -> PathBuf {
    PathBuf::from("manifest.json")
}

fn default_label_prefix() -> String {
    "assignmentlabels_".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            assignment_file: default_assignment_file(),
            seed_file: default_seed_file(),
            manifest_file: default_manifest_file(),
            label_prefix: default_label_prefix(),
        }
    }
}

/// Columns printed on each label, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default)]
    pub columns: Vec<String>,
}
