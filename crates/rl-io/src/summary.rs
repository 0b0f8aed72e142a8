//! Review summary of the columns selected for a run.

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use rl_assign::{ColumnRole, Design, Roster};
use rl_core::errors::RlError;
use serde::Serialize;

/// Distinct values of one selected column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub role: ColumnRole,
    pub unique_count: usize,
    /// Sorted distinct values; left empty for the identity column.
    pub unique_values: Vec<String>,
}

/// Summarises the identity, block and stratification columns of `design`.
pub fn summarize_design(roster: &Roster, design: &Design) -> Result<Vec<ColumnSummary>, RlError> {
    design.resolve(roster)?;
    let mut out = Vec::new();
    for (role, column) in design.selections() {
        let idx = roster.require_column(column, role.as_str())?;
        let unique: BTreeSet<&str> = roster.column_values(idx).collect();
        out.push(ColumnSummary {
            column: column.to_string(),
            role,
            unique_count: unique.len(),
            unique_values: if role == ColumnRole::Unit {
                Vec::new()
            } else {
                unique.into_iter().map(str::to_string).collect()
            },
        });
    }
    Ok(out)
}

impl Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(80);
        writeln!(f, "{rule}")?;
        writeln!(f, "For the {}: {}", self.role, self.column)?;
        writeln!(f, "{}", ".".repeat(80))?;
        writeln!(f, "Number of unique values = {}", self.unique_count)?;
        if self.role != ColumnRole::Unit {
            writeln!(f, "Unique values:")?;
            for value in &self.unique_values {
                writeln!(f, "  {value}")?;
            }
        }
        write!(f, "{rule}")
    }
}
