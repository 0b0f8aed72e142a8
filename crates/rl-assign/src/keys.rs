//! Composite grouping keys and the cell partition.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::roster::Roster;

/// Ordered tuple of grouping values; empty when the run is ungrouped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn is_global(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(all)");
        }
        write!(f, "({})", self.0.join(", "))
    }
}

/// Units sharing one [`GroupKey`], as roster row indices in row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub key: GroupKey,
    pub rows: Vec<usize>,
}

impl Cell {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Key of every row, in row order.
pub fn extract_keys(roster: &Roster, grouping: &[usize]) -> Vec<GroupKey> {
    roster
        .rows()
        .iter()
        .map(|row| GroupKey(grouping.iter().map(|&col| row[col].clone()).collect()))
        .collect()
}

/// Splits the roster into cells.
///
/// Cells come back in ascending key order; this is the order the random
/// stream is consumed in. Rows inside a cell keep roster order.
pub fn partition(roster: &Roster, grouping: &[usize]) -> Vec<Cell> {
    let mut cells: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (row, key) in extract_keys(roster, grouping).into_iter().enumerate() {
        cells.entry(key).or_default().push(row);
    }
    cells
        .into_iter()
        .map(|(key, rows)| Cell { key, rows })
        .collect()
}
