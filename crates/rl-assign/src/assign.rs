//! Assignment orchestration: validate, partition, sample per cell, recombine.

use std::collections::BTreeMap;

use rl_core::errors::{codes, ErrorInfo, RlError};
use rl_core::rng::{stable_key_id, RngHandle};
use rl_core::seed::CommittedSeed;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::design::{Design, ResolvedDesign};
use crate::keys::{partition, Cell, GroupKey};
use crate::roster::Roster;
use crate::sampler::{balanced_indices, index_counts};
use crate::vocabulary::ConditionVocabulary;

/// Column name carrying the condition in recombined and persisted tables.
pub const ASSIGN_COLUMN: &str = "assign";

/// How cells draw their randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingMode {
    /// One stream for the run, consumed cell by cell in ascending key order.
    #[default]
    Sequential,
    /// Each cell seeds its own stream from `(seed, key)`; cells are independent.
    PerCellSubstream,
}

/// One unit and its condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedUnit {
    pub unit: String,
    pub condition: String,
}

/// Unit identity to condition mapping, in roster row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub unit_column: String,
    pub units: Vec<AssignedUnit>,
}

impl Assignment {
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn condition_of(&self, unit: &str) -> Option<&str> {
        self.units
            .iter()
            .find(|assigned| assigned.unit == unit)
            .map(|assigned| assigned.condition.as_str())
    }

    /// Number of units per condition.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for assigned in &self.units {
            *counts.entry(assigned.condition.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Two-column `{unit_column, assign}` table.
    pub fn to_roster(&self) -> Result<Roster, RlError> {
        Roster::new(
            vec![self.unit_column.clone(), ASSIGN_COLUMN.to_string()],
            self.units
                .iter()
                .map(|assigned| vec![assigned.unit.clone(), assigned.condition.clone()])
                .collect(),
        )
    }
}

/// Size and condition counts of one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSummary {
    pub key: GroupKey,
    pub size: usize,
    pub counts: BTreeMap<String, usize>,
}

/// Result of a randomization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub assignment: Assignment,
    /// Cells in the order they were sampled.
    pub cells: Vec<CellSummary>,
}

impl AssignmentOutcome {
    /// The roster with an `assign` column holding each unit's condition.
    ///
    /// `roster` must be the table the assignment was drawn from.
    pub fn recombine(&self, roster: &Roster) -> Result<Roster, RlError> {
        check_output_column(roster)?;
        let unit_col = roster.require_column(&self.assignment.unit_column, "randomization unit")?;
        if roster.row_count() != self.assignment.len() {
            return Err(RlError::Roster(
                ErrorInfo::new(codes::ROSTER_SHAPE, "roster does not match assignment")
                    .with_context("roster_rows", roster.row_count().to_string())
                    .with_context("assigned_units", self.assignment.len().to_string()),
            ));
        }
        let mut values = Vec::with_capacity(roster.row_count());
        for (row, assigned) in self.assignment.units.iter().enumerate() {
            if roster.value(row, unit_col) != assigned.unit {
                return Err(RlError::Roster(
                    ErrorInfo::new(codes::ROSTER_SHAPE, "roster does not match assignment")
                        .with_context("row", row.to_string())
                        .with_context("unit", assigned.unit.clone()),
                ));
            }
            values.push(assigned.condition.clone());
        }
        roster.with_column(ASSIGN_COLUMN, values)
    }
}

/// Validates run inputs and partitions the roster.
///
/// Checks run in a fixed order: empty roster, unknown columns, column reuse
/// (including a roster that already carries an `assign` column), duplicate
/// identities. Nothing is drawn before all of them pass.
pub fn prepare(roster: &Roster, design: &Design) -> Result<(ResolvedDesign, Vec<Cell>), RlError> {
    if roster.is_empty() {
        return Err(RlError::Roster(ErrorInfo::new(
            codes::EMPTY_ROSTER,
            "roster has no rows to randomize",
        )));
    }
    let resolved = design.resolve(roster)?;
    check_output_column(roster)?;
    check_unique_units(roster, resolved.unit, &design.unit_column)?;
    let cells = partition(roster, &resolved.grouping);
    Ok((resolved, cells))
}

/// Rejects a roster whose header already holds [`ASSIGN_COLUMN`].
pub fn check_output_column(roster: &Roster) -> Result<(), RlError> {
    match roster.column_index(ASSIGN_COLUMN) {
        Some(idx) => Err(RlError::Design(
            ErrorInfo::new(
                codes::COLUMN_REUSE_CONFLICT,
                "roster already has a column named like the assignment output",
            )
            .with_context("column", ASSIGN_COLUMN)
            .with_context("index", idx.to_string())
            .with_hint("rename the column before randomizing"),
        )),
        None => Ok(()),
    }
}

fn check_unique_units(roster: &Roster, unit_col: usize, column: &str) -> Result<(), RlError> {
    let mut first_seen: BTreeMap<&str, usize> = BTreeMap::new();
    for (row, unit) in roster.column_values(unit_col).enumerate() {
        if let Some(first) = first_seen.insert(unit, row) {
            return Err(RlError::Roster(
                ErrorInfo::new(
                    codes::DUPLICATE_UNIT_IDENTITY,
                    "randomization unit values are not unique",
                )
                .with_context("column", column)
                .with_context("unit", unit)
                .with_context("first_row", first.to_string())
                .with_context("second_row", row.to_string())
                .with_hint("choose a column with one distinct value per row"),
            ));
        }
    }
    Ok(())
}

/// Randomizes with one stream consumed in ascending cell-key order.
pub fn assign(
    roster: &Roster,
    vocabulary: &ConditionVocabulary,
    design: &Design,
    rng: &mut RngHandle,
) -> Result<AssignmentOutcome, RlError> {
    let k = vocabulary.len();
    assign_cells(roster, vocabulary, design, |cell| {
        balanced_indices(cell.len(), k, &mut *rng)
    })
}

/// Randomizes each cell from its own stream derived from `(master_seed, key)`.
pub fn assign_substreams(
    roster: &Roster,
    vocabulary: &ConditionVocabulary,
    design: &Design,
    master_seed: u64,
) -> Result<AssignmentOutcome, RlError> {
    let k = vocabulary.len();
    assign_cells(roster, vocabulary, design, |cell| {
        let mut rng = RngHandle::substream(master_seed, stable_key_id(cell.key.parts()));
        balanced_indices(cell.len(), k, &mut rng)
    })
}

/// Randomizes from a committed seed in the requested mode.
pub fn randomize(
    roster: &Roster,
    vocabulary: &ConditionVocabulary,
    design: &Design,
    mode: SamplingMode,
    seed: &CommittedSeed,
) -> Result<AssignmentOutcome, RlError> {
    match mode {
        SamplingMode::Sequential => {
            let mut rng = seed.open_rng();
            assign(roster, vocabulary, design, &mut rng)
        }
        SamplingMode::PerCellSubstream => {
            assign_substreams(roster, vocabulary, design, seed.seed().value())
        }
    }
}

fn assign_cells<F>(
    roster: &Roster,
    vocabulary: &ConditionVocabulary,
    design: &Design,
    mut draw: F,
) -> Result<AssignmentOutcome, RlError>
where
    F: FnMut(&Cell) -> Result<Vec<usize>, RlError>,
{
    let (resolved, cells) = prepare(roster, design)?;
    info!(
        units = roster.row_count(),
        cells = cells.len(),
        conditions = vocabulary.len(),
        "partitioned roster"
    );

    let labels = vocabulary.labels();
    let mut slots: Vec<Option<usize>> = vec![None; roster.row_count()];
    let mut summaries = Vec::with_capacity(cells.len());
    for cell in &cells {
        let drawn = draw(cell)?;
        for (&row, &idx) in cell.rows.iter().zip(&drawn) {
            slots[row] = Some(idx);
        }
        let counts: BTreeMap<String, usize> = index_counts(&drawn, labels.len())
            .into_iter()
            .enumerate()
            .map(|(idx, count)| (labels[idx].clone(), count))
            .collect();
        debug!(key = %cell.key, size = cell.len(), ?counts, "cell assigned");
        summaries.push(CellSummary {
            key: cell.key.clone(),
            size: cell.len(),
            counts,
        });
    }

    let mut units = Vec::with_capacity(slots.len());
    for (row, slot) in slots.into_iter().enumerate() {
        let idx = slot.ok_or_else(|| {
            RlError::Roster(
                ErrorInfo::new(codes::ROSTER_SHAPE, "row was not covered by any cell")
                    .with_context("row", row.to_string()),
            )
        })?;
        units.push(AssignedUnit {
            unit: roster.value(row, resolved.unit).to_string(),
            condition: labels[idx].clone(),
        });
    }

    let assignment = Assignment {
        unit_column: design.unit_column.clone(),
        units,
    };
    info!(units = assignment.len(), counts = ?assignment.counts(), "assignment complete");
    Ok(AssignmentOutcome {
        assignment,
        cells: summaries,
    })
}
