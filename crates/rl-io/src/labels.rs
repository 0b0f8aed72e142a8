//! Per-condition label sheets.

use std::fs;
use std::path::{Path, PathBuf};

use rl_assign::{ConditionVocabulary, Roster};
use rl_core::errors::{codes, ErrorInfo, RlError};
use tracing::{debug, info};

/// Labels of every unit that received one condition, in roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSheet {
    pub condition: String,
    pub labels: Vec<String>,
}

impl LabelSheet {
    /// Sheet text: labels separated by a blank line.
    pub fn render(&self) -> String {
        let mut text = self.labels.join("\n\n");
        text.push('\n');
        text
    }
}

/// Groups rows by condition and builds one label per row from `columns`.
///
/// Rows whose condition is `None` are skipped. Sheets follow `vocabulary`
/// order when given, otherwise the order conditions are first seen.
pub fn build_label_sheets(
    roster: &Roster,
    conditions: &[Option<String>],
    columns: &[String],
    vocabulary: Option<&ConditionVocabulary>,
) -> Result<Vec<LabelSheet>, RlError> {
    if columns.is_empty() {
        return Err(RlError::Design(
            ErrorInfo::new(codes::EMPTY_LABEL_SELECTION, "no label columns selected")
                .with_hint("select at least one column to print on each label"),
        ));
    }
    if conditions.len() != roster.row_count() {
        return Err(RlError::Roster(
            ErrorInfo::new(codes::ROSTER_SHAPE, "conditions do not match roster rows")
                .with_context("roster_rows", roster.row_count().to_string())
                .with_context("conditions", conditions.len().to_string()),
        ));
    }
    let indices = columns
        .iter()
        .map(|column| roster.require_column(column, "label"))
        .collect::<Result<Vec<_>, _>>()?;

    let mut sheets: Vec<LabelSheet> = vocabulary
        .map(|vocab| {
            vocab
                .labels()
                .iter()
                .map(|condition| LabelSheet {
                    condition: condition.clone(),
                    labels: Vec::new(),
                })
                .collect()
        })
        .unwrap_or_default();

    for (row, condition) in conditions.iter().enumerate() {
        let Some(condition) = condition else {
            continue;
        };
        let label = indices
            .iter()
            .map(|&col| roster.value(row, col))
            .collect::<Vec<_>>()
            .join("\n");
        match sheets.iter_mut().find(|sheet| &sheet.condition == condition) {
            Some(sheet) => sheet.labels.push(label),
            None => sheets.push(LabelSheet {
                condition: condition.clone(),
                labels: vec![label],
            }),
        }
    }
    Ok(sheets)
}

/// File name for one condition's sheet.
pub fn sheet_file_name(prefix: &str, condition: &str) -> String {
    let safe: String = condition
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{prefix}{safe}.txt")
}

/// Writes every non-empty sheet into `dir` and returns the written paths.
pub fn write_label_sheets(
    dir: &Path,
    prefix: &str,
    sheets: &[LabelSheet],
) -> Result<Vec<PathBuf>, RlError> {
    fs::create_dir_all(dir).map_err(|err| RlError::io("labels-mkdir", dir.display(), err))?;
    let mut written = Vec::new();
    for sheet in sheets.iter().filter(|sheet| !sheet.labels.is_empty()) {
        let path = dir.join(sheet_file_name(prefix, &sheet.condition));
        fs::write(&path, sheet.render())
            .map_err(|err| RlError::io("labels-write", path.display(), err))?;
        debug!(path = %path.display(), labels = sheet.labels.len(), "label sheet written");
        written.push(path);
    }
    info!(sheets = written.len(), "label sheets written");
    Ok(written)
}
