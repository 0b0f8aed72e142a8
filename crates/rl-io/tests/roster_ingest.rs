use std::fs;

use rl_assign::{ColumnRole, Design};
use rl_core::errors::{codes, ErrorKind};
use rl_io::{read_roster, read_roster_from, summarize_design};
use tempfile::tempdir;

const CLASS_CSV: &str = "\
id,school,grade,name
1,north,3,Ana
2,south,3,Ben
3,north,4,Cy
4,north,3,Di
5,south,4,Ed
";

#[test]
fn reads_header_and_rows_verbatim() {
    let roster = read_roster_from(CLASS_CSV.as_bytes()).expect("parse");
    assert_eq!(roster.columns(), ["id", "school", "grade", "name"]);
    assert_eq!(roster.row_count(), 5);
    assert_eq!(roster.value(2, 3), "Cy");
}

#[test]
fn keeps_whitespace_and_quoted_commas() {
    let csv = "id,name\n1,\" Ana, Jr \"\n2,Ben\n";
    let roster = read_roster_from(csv.as_bytes()).expect("parse");
    assert_eq!(roster.value(0, 1), " Ana, Jr ");
}

#[test]
fn strips_byte_order_mark_from_first_header() {
    let csv = "\u{feff}id,name\n1,Ana\n";
    let roster = read_roster_from(csv.as_bytes()).expect("parse");
    assert_eq!(roster.column_index("id"), Some(0));
}

#[test]
fn ragged_rows_are_shape_errors() {
    let csv = "id,name\n1,Ana\n2\n";
    let err = read_roster_from(csv.as_bytes()).expect_err("ragged");
    assert_eq!(err.code(), codes::ROSTER_SHAPE);
    assert_eq!(err.info().context.get("row").map(String::as_str), Some("1"));
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.csv");
    let err = read_roster(&path).expect_err("missing");
    assert_eq!(err.code(), codes::ROSTER_READ);
    assert_eq!(
        err.info().context.get("path").map(String::as_str),
        Some(path.display().to_string().as_str())
    );
}

#[test]
fn reads_roster_from_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("class.csv");
    fs::write(&path, CLASS_CSV).expect("write");
    let roster = read_roster(&path).expect("read");
    assert_eq!(roster.row_count(), 5);
}

#[test]
fn summary_reports_roles_and_sorted_unique_values() {
    let roster = read_roster_from(CLASS_CSV.as_bytes()).expect("parse");
    let design = Design::new("id").with_blocks(["school"]).with_strata(["grade"]);
    let summary = summarize_design(&roster, &design).expect("summary");

    assert_eq!(summary.len(), 3);
    assert_eq!(summary[0].role, ColumnRole::Unit);
    assert_eq!(summary[0].unique_count, 5);
    assert!(summary[0].unique_values.is_empty());

    assert_eq!(summary[1].column, "school");
    assert_eq!(summary[1].unique_values, ["north", "south"]);
    assert_eq!(summary[2].role, ColumnRole::Stratum);
    assert_eq!(summary[2].unique_values, ["3", "4"]);

    let text = summary[1].to_string();
    assert!(text.contains("For the blocking group: school"));
    assert!(text.contains("Number of unique values = 2"));
}

#[test]
fn summary_rejects_unknown_columns() {
    let roster = read_roster_from(CLASS_CSV.as_bytes()).expect("parse");
    let design = Design::new("id").with_blocks(["district"]);
    let err = summarize_design(&roster, &design).expect_err("unknown");
    assert_eq!(err.kind(), ErrorKind::UnknownColumnSelector);
}
