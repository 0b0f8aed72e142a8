//! CSV roster ingestion.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use rl_assign::Roster;
use rl_core::errors::{codes, ErrorInfo, RlError};
use tracing::debug;

fn read_error(path: &Path, err: impl ToString) -> RlError {
    RlError::Roster(
        ErrorInfo::new(codes::ROSTER_READ, err.to_string())
            .with_context("path", path.display().to_string()),
    )
}

/// Loads a roster from a CSV file with a header row.
pub fn read_roster(path: &Path) -> Result<Roster, RlError> {
    let file = File::open(path).map_err(|err| read_error(path, err))?;
    let roster = read_roster_from(file).map_err(|err| match err {
        RlError::Roster(info) => RlError::Roster(
            info.with_context("path", path.display().to_string()),
        ),
        other => other,
    })?;
    debug!(
        path = %path.display(),
        rows = roster.row_count(),
        columns = roster.columns().len(),
        "roster loaded"
    );
    Ok(roster)
}

/// Loads a roster from any CSV source with a header row.
///
/// Values are kept verbatim. A leading byte-order mark on the first header is
/// dropped.
pub fn read_roster_from<R: Read>(source: R) -> Result<Roster, RlError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(source);
    let mut columns: Vec<String> = reader
        .headers()
        .map_err(|err| RlError::Roster(ErrorInfo::new(codes::ROSTER_READ, err.to_string())))?
        .iter()
        .map(str::to_string)
        .collect();
    if let Some(first) = columns.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|err| RlError::Roster(ErrorInfo::new(codes::ROSTER_READ, err.to_string())))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Roster::new(columns, rows)
}
