//! Balanced, seed-reproducible group randomization.
//!
//! A run resolves its [`Design`] against a [`Roster`], partitions the units
//! into cells by grouping key, draws a balanced label sequence per cell and
//! recombines the draws into one [`Assignment`].

pub mod assign;
pub mod canonical;
pub mod config;
pub mod design;
pub mod keys;
pub mod manifest;
pub mod roster;
pub mod sampler;
pub mod vocabulary;

pub use assign::{
    assign, assign_substreams, check_output_column, prepare, randomize, AssignedUnit, Assignment,
    AssignmentOutcome, CellSummary, SamplingMode, ASSIGN_COLUMN,
};
pub use canonical::{stable_hash_string, to_canonical_json_bytes};
pub use config::{LabelConfig, OutputConfig, RunConfig, SeedConfig};
pub use design::{ColumnRole, Design, ResolvedDesign};
pub use keys::{extract_keys, partition, Cell, GroupKey};
pub use manifest::{RunManifest, MANIFEST_SCHEMA};
pub use roster::Roster;
pub use sampler::{balanced_indices, balanced_sample, index_counts};
pub use vocabulary::{ConditionVocabulary, CONTROL_LABEL};
