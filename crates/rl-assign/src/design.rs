//! Column roles of a randomization run.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use rl_core::errors::{codes, ErrorInfo, RlError};
use serde::{Deserialize, Serialize};

use crate::roster::Roster;

/// Role a roster column plays in the design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Unique identity of the randomization unit.
    Unit,
    /// Blocking group.
    Block,
    /// Stratification category.
    Stratum,
}

impl ColumnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Unit => "randomization unit",
            ColumnRole::Block => "blocking group",
            ColumnRole::Stratum => "stratification category",
        }
    }
}

impl Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which columns identify units and which form the grouping key.
///
/// The grouping key is the block columns followed by the stratification
/// columns, as one flat composite key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Design {
    #[serde(default)]
    pub unit_column: String,
    #[serde(default)]
    pub block_columns: Vec<String>,
    #[serde(default)]
    pub strata_columns: Vec<String>,
}

/// Column indices of a [`Design`] checked against one roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDesign {
    pub unit: usize,
    pub grouping: Vec<usize>,
}

impl Design {
    pub fn new(unit_column: impl Into<String>) -> Self {
        Self {
            unit_column: unit_column.into(),
            block_columns: Vec::new(),
            strata_columns: Vec::new(),
        }
    }

    pub fn with_blocks<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.block_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strata<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strata_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// True when every unit falls into the single global cell.
    pub fn is_ungrouped(&self) -> bool {
        self.block_columns.is_empty() && self.strata_columns.is_empty()
    }

    /// Grouping columns in key order.
    pub fn grouping_columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.block_columns
            .iter()
            .chain(self.strata_columns.iter())
            .map(String::as_str)
    }

    /// Every selected column with its role, identity first.
    pub fn selections(&self) -> Vec<(ColumnRole, &str)> {
        let mut out = vec![(ColumnRole::Unit, self.unit_column.as_str())];
        out.extend(
            self.block_columns
                .iter()
                .map(|column| (ColumnRole::Block, column.as_str())),
        );
        out.extend(
            self.strata_columns
                .iter()
                .map(|column| (ColumnRole::Stratum, column.as_str())),
        );
        out
    }

    /// Checks that every selection exists and no column is used twice.
    pub fn resolve(&self, roster: &Roster) -> Result<ResolvedDesign, RlError> {
        let selections = self.selections();
        let mut indices = Vec::with_capacity(selections.len());
        for &(role, column) in &selections {
            indices.push(roster.require_column(column, role.as_str())?);
        }

        let mut first_role: BTreeMap<&str, ColumnRole> = BTreeMap::new();
        for &(role, column) in &selections {
            if let Some(previous) = first_role.insert(column, role) {
                return Err(RlError::Design(
                    ErrorInfo::new(
                        codes::COLUMN_REUSE_CONFLICT,
                        "column selected for more than one role",
                    )
                    .with_context("column", column)
                    .with_context("first_role", previous.as_str())
                    .with_context("second_role", role.as_str()),
                ));
            }
        }

        Ok(ResolvedDesign {
            unit: indices[0],
            grouping: indices[1..].to_vec(),
        })
    }
}
