//! File-facing layer of randomize-label: roster CSV ingestion, the column
//! review summary, assignment files and label sheets.

pub mod labels;
pub mod persist;
pub mod roster;
pub mod summary;

pub use labels::{build_label_sheets, sheet_file_name, write_label_sheets, LabelSheet};
pub use persist::{merge_assignment, read_assignment, write_assignment, MergedRoster};
pub use roster::{read_roster, read_roster_from};
pub use summary::{summarize_design, ColumnSummary};
