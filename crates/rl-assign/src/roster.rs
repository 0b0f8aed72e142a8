//! In-memory roster table.

use std::collections::BTreeSet;

use rl_core::errors::{codes, ErrorInfo, RlError};
use serde::Serialize;

/// Rectangular table of text values with named columns.
///
/// Values are kept exactly as supplied; equality between values is plain
/// string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Roster {
    /// Builds a roster, rejecting repeated header names and ragged rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, RlError> {
        let mut seen = BTreeSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(RlError::Roster(
                    ErrorInfo::new(codes::ROSTER_SHAPE, "header repeats a column name")
                        .with_context("column", name.clone()),
                ));
            }
        }
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(RlError::Roster(
                    ErrorInfo::new(codes::ROSTER_SHAPE, "row width does not match header")
                        .with_context("row", idx.to_string())
                        .with_context("expected", columns.len().to_string())
                        .with_context("found", row.len().to_string()),
                ));
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Index of `name`, or an `unknown-column-selector` error naming it.
    pub fn require_column(&self, name: &str, role: &str) -> Result<usize, RlError> {
        self.column_index(name).ok_or_else(|| {
            RlError::Design(
                ErrorInfo::new(codes::UNKNOWN_COLUMN_SELECTOR, "column not present in roster")
                    .with_context("column", name)
                    .with_context("role", role)
                    .with_hint(format!("available columns: {}", self.columns.join(", "))),
            )
        })
    }

    /// Value at `(row, column)`. Panics when out of bounds.
    pub fn value(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[column].as_str())
    }

    /// Copy of the roster with a new trailing column `name`.
    ///
    /// Existing columns are never overwritten; a name already in the header is
    /// a `column-reuse-conflict`.
    pub fn with_column(&self, name: &str, values: Vec<String>) -> Result<Self, RlError> {
        if self.column_index(name).is_some() {
            return Err(RlError::Design(
                ErrorInfo::new(codes::COLUMN_REUSE_CONFLICT, "roster already has this column")
                    .with_context("column", name),
            ));
        }
        if values.len() != self.rows.len() {
            return Err(RlError::Roster(
                ErrorInfo::new(codes::ROSTER_SHAPE, "column length does not match roster")
                    .with_context("column", name)
                    .with_context("expected", self.rows.len().to_string())
                    .with_context("found", values.len().to_string()),
            ));
        }
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let mut rows = self.rows.clone();
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(Self { columns, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rl_core::ErrorKind;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = Roster::new(strings(&["id", "school"]), vec![strings(&["1"])]).unwrap_err();
        assert_eq!(err.code(), codes::ROSTER_SHAPE);
    }

    #[test]
    fn unknown_column_names_role() {
        let roster = Roster::new(strings(&["id"]), vec![strings(&["1"])]).unwrap();
        let err = roster.require_column("school", "block").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownColumnSelector);
        assert_eq!(err.info().context["role"], "block");
    }

    #[test]
    fn with_column_appends_and_never_overwrites() {
        let roster = Roster::new(strings(&["id"]), vec![strings(&["1"]), strings(&["2"])]).unwrap();
        let added = roster.with_column("assign", strings(&["C", "T"])).unwrap();
        assert_eq!(added.columns(), ["id", "assign"]);
        assert_eq!(added.value(1, 1), "T");
        let err = added.with_column("assign", strings(&["T", "C"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnReuseConflict);
        let err = added.with_column("id", strings(&["x", "y"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnReuseConflict);
    }
}
