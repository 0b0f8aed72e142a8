//! Two-column assignment files and merging them back onto a roster.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Writer};
use rl_assign::{AssignedUnit, Assignment, Roster, ASSIGN_COLUMN};
use rl_core::errors::{codes, ErrorInfo, RlError};
use tracing::{debug, info};

/// Writes `{unit column, assign}` rows in assignment order.
pub fn write_assignment(path: &Path, assignment: &Assignment) -> Result<(), RlError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| RlError::io("assignment-mkdir", parent.display(), err))?;
    }
    let mut writer =
        Writer::from_path(path).map_err(|err| RlError::io("assignment-write", path.display(), err))?;
    writer
        .write_record([assignment.unit_column.as_str(), ASSIGN_COLUMN])
        .map_err(|err| RlError::io("assignment-write", path.display(), err))?;
    for assigned in &assignment.units {
        writer
            .write_record([assigned.unit.as_str(), assigned.condition.as_str()])
            .map_err(|err| RlError::io("assignment-write", path.display(), err))?;
    }
    writer
        .flush()
        .map_err(|err| RlError::io("assignment-write", path.display(), err))?;
    debug!(path = %path.display(), units = assignment.len(), "assignment written");
    Ok(())
}

/// Reads an assignment file written by [`write_assignment`].
///
/// The first header names the unit column; the second must be `assign`.
pub fn read_assignment(path: &Path) -> Result<Assignment, RlError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| RlError::io("assignment-read", path.display(), err))?;
    let headers = reader
        .headers()
        .map_err(|err| RlError::io("assignment-read", path.display(), err))?
        .clone();
    if headers.len() != 2 || &headers[1] != ASSIGN_COLUMN {
        return Err(RlError::Roster(
            ErrorInfo::new(
                codes::ROSTER_SHAPE,
                "assignment file must have exactly a unit column and an assign column",
            )
            .with_context("path", path.display().to_string())
            .with_context("header", headers.iter().collect::<Vec<_>>().join(",")),
        ));
    }
    let unit_column = headers[0].trim_start_matches('\u{feff}').to_string();
    let mut units = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| RlError::io("assignment-read", path.display(), err))?;
        units.push(AssignedUnit {
            unit: record[0].to_string(),
            condition: record[1].to_string(),
        });
    }
    Ok(Assignment { unit_column, units })
}

/// Roster joined with a saved assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRoster {
    pub roster: Roster,
    /// Condition per roster row; `None` when the unit had no saved entry.
    pub conditions: Vec<Option<String>>,
}

impl MergedRoster {
    pub fn assigned(&self) -> usize {
        self.conditions.iter().filter(|c| c.is_some()).count()
    }

    /// The roster with an `assign` column, blank for unassigned rows.
    ///
    /// Fails when the roster already has an `assign` column.
    pub fn to_table(&self) -> Result<Roster, RlError> {
        self.roster.with_column(
            ASSIGN_COLUMN,
            self.conditions
                .iter()
                .map(|c| c.clone().unwrap_or_default())
                .collect(),
        )
    }
}

/// Left-joins `saved` onto `roster` by the saved unit column.
///
/// Every saved identity must match exactly one roster row. Roster rows with no
/// saved entry keep no condition.
pub fn merge_assignment(roster: &Roster, saved: &Assignment) -> Result<MergedRoster, RlError> {
    let unit_col = roster.require_column(&saved.unit_column, "randomization unit")?;

    let mut saved_by_unit: BTreeMap<&str, &str> = BTreeMap::new();
    for assigned in &saved.units {
        if saved_by_unit
            .insert(assigned.unit.as_str(), assigned.condition.as_str())
            .is_some()
        {
            return Err(RlError::Roster(
                ErrorInfo::new(
                    codes::DUPLICATE_UNIT_IDENTITY,
                    "saved assignment lists a unit more than once",
                )
                .with_context("column", saved.unit_column.clone())
                .with_context("unit", assigned.unit.clone()),
            ));
        }
    }

    let mut rows_by_unit: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, unit) in roster.column_values(unit_col).enumerate() {
        rows_by_unit.entry(unit).or_default().push(row);
    }

    let mut conditions = vec![None; roster.row_count()];
    for (unit, condition) in &saved_by_unit {
        match rows_by_unit.get(unit).map(Vec::as_slice) {
            None | Some([]) => {
                return Err(RlError::Roster(
                    ErrorInfo::new(
                        codes::UNMATCHED_ASSIGNMENT,
                        "saved assignment names a unit missing from the roster",
                    )
                    .with_context("column", saved.unit_column.clone())
                    .with_context("unit", *unit),
                ));
            }
            Some([row]) => conditions[*row] = Some(condition.to_string()),
            Some(rows) => {
                return Err(RlError::Roster(
                    ErrorInfo::new(
                        codes::DUPLICATE_UNIT_IDENTITY,
                        "saved unit matches several roster rows",
                    )
                    .with_context("column", saved.unit_column.clone())
                    .with_context("unit", *unit)
                    .with_context("rows", rows.len().to_string()),
                ));
            }
        }
    }

    let merged = MergedRoster {
        roster: roster.clone(),
        conditions,
    };
    info!(
        rows = roster.row_count(),
        assigned = merged.assigned(),
        "merged saved assignment"
    );
    Ok(merged)
}
