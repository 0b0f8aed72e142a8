//! Structured error types shared across randomize-label crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable machine readable error codes.
pub mod codes {
    /// Negative treatment-arm count.
    pub const INVALID_ARM_COUNT: &str = "invalid-arm-count";
    /// Explicit vocabulary with blank, duplicate or missing labels.
    pub const INVALID_VOCABULARY: &str = "invalid-vocabulary";
    /// Identity or grouping column missing from the roster header.
    pub const UNKNOWN_COLUMN_SELECTOR: &str = "unknown-column-selector";
    /// Same column selected for more than one design role.
    pub const COLUMN_REUSE_CONFLICT: &str = "column-reuse-conflict";
    /// Label rendering requested without any label column.
    pub const EMPTY_LABEL_SELECTION: &str = "empty-label-selection";
    /// Roster without data rows.
    pub const EMPTY_ROSTER: &str = "empty-roster";
    /// Identity column holds a repeated value.
    pub const DUPLICATE_UNIT_IDENTITY: &str = "duplicate-unit-identity";
    /// Saved assignment entry that matches no roster row.
    pub const UNMATCHED_ASSIGNMENT: &str = "unmatched-assignment";
    /// Roster file could not be opened or parsed.
    pub const ROSTER_READ: &str = "roster-read";
    /// Roster row whose width disagrees with the header.
    pub const ROSTER_SHAPE: &str = "roster-shape";
    /// Seed text that is not a usable integer.
    pub const INVALID_SEED: &str = "invalid-seed";
    /// Stored seed differs from the one being committed.
    pub const SEED_CONFLICT: &str = "seed-conflict";
    /// Seed file could not be read or written.
    pub const SEED_IO: &str = "seed-io";
}

/// Structured payload attached to every [`RlError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (column names, identities, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for randomization runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum RlError {
    /// Vocabulary and column-selection errors.
    #[error("design error: {0}")]
    Design(ErrorInfo),
    /// Roster shape, identity and join errors.
    #[error("roster error: {0}")]
    Roster(ErrorInfo),
    /// Seed parsing and persistence errors.
    #[error("seed error: {0}")]
    Seed(ErrorInfo),
    /// Filesystem errors while writing or reading run artifacts.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

/// Coarse classification of precondition failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`codes::INVALID_ARM_COUNT`].
    InvalidArmCount,
    /// See [`codes::INVALID_VOCABULARY`].
    InvalidVocabulary,
    /// See [`codes::INVALID_SEED`].
    InvalidSeed,
    /// See [`codes::SEED_CONFLICT`].
    SeedConflict,
    /// See [`codes::DUPLICATE_UNIT_IDENTITY`].
    DuplicateUnitIdentity,
    /// See [`codes::EMPTY_ROSTER`].
    EmptyRoster,
    /// See [`codes::UNKNOWN_COLUMN_SELECTOR`].
    UnknownColumnSelector,
    /// See [`codes::COLUMN_REUSE_CONFLICT`].
    ColumnReuseConflict,
    /// See [`codes::UNMATCHED_ASSIGNMENT`].
    UnmatchedAssignment,
    /// Anything that is not a precondition violation (I/O, parse, serde).
    Other,
}

impl RlError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            RlError::Design(info)
            | RlError::Roster(info)
            | RlError::Seed(info)
            | RlError::Io(info)
            | RlError::Serde(info) => info,
        }
    }

    /// Stable code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Maps the payload code onto the precondition taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self.code() {
            codes::INVALID_ARM_COUNT => ErrorKind::InvalidArmCount,
            codes::INVALID_VOCABULARY => ErrorKind::InvalidVocabulary,
            codes::INVALID_SEED => ErrorKind::InvalidSeed,
            codes::SEED_CONFLICT => ErrorKind::SeedConflict,
            codes::DUPLICATE_UNIT_IDENTITY => ErrorKind::DuplicateUnitIdentity,
            codes::EMPTY_ROSTER => ErrorKind::EmptyRoster,
            codes::UNKNOWN_COLUMN_SELECTOR => ErrorKind::UnknownColumnSelector,
            codes::COLUMN_REUSE_CONFLICT => ErrorKind::ColumnReuseConflict,
            codes::UNMATCHED_ASSIGNMENT => ErrorKind::UnmatchedAssignment,
            _ => ErrorKind::Other,
        }
    }

    /// Shorthand for an [`RlError::Io`] carrying the offending path.
    pub fn io(code: &str, path: impl Display, err: impl ToString) -> Self {
        RlError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.to_string()),
        )
    }
}
