use std::collections::BTreeSet;

use rl_assign::{
    assign, assign_substreams, randomize, ConditionVocabulary, Design, Roster, SamplingMode,
    ASSIGN_COLUMN,
};
use rl_core::errors::ErrorKind;
use rl_core::rng::RngHandle;
use rl_core::seed::{MemorySeedStore, Seed, SeedManager, SeedPolicy};

fn roster(columns: &[&str], rows: &[&[&str]]) -> Roster {
    Roster::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect(),
    )
    .expect("roster")
}

fn ten_units() -> Roster {
    let rows: Vec<Vec<String>> = (1..=10)
        .map(|idx| vec![format!("p{idx:02}"), format!("Person {idx}")])
        .collect();
    Roster::new(vec!["id".into(), "name".into()], rows).expect("roster")
}

fn classroom_roster() -> Roster {
    roster(
        &["id", "school", "grade", "name"],
        &[
            &["1", "north", "3", "Ana"],
            &["2", "south", "3", "Ben"],
            &["3", "north", "4", "Cy"],
            &["4", "north", "3", "Di"],
            &["5", "south", "4", "Ed"],
            &["6", "south", "3", "Flo"],
            &["7", "north", "3", "Gus"],
            &["8", "north", "4", "Hal"],
            &["9", "south", "4", "Ivy"],
            &["10", "north", "3", "Jo"],
            &["11", "south", "3", "Kai"],
            &["12", "north", "4", "Lu"],
        ],
    )
}

fn run(roster: &Roster, design: &Design, arms: i64, seed: u64) -> rl_assign::AssignmentOutcome {
    let vocab = ConditionVocabulary::for_arms(arms).expect("vocab");
    let mut rng = RngHandle::from_seed(seed);
    assign(roster, &vocab, design, &mut rng).expect("assign")
}

#[test]
fn ten_units_split_five_five_and_reproduce() {
    let roster = ten_units();
    let design = Design::new("id");
    let first = run(&roster, &design, 1, 123456);
    let counts = first.assignment.counts();
    assert_eq!(counts["C"], 5);
    assert_eq!(counts["T"], 5);

    let again = run(&roster, &design, 1, 123456);
    assert_eq!(first, again);

    let other = run(&roster, &design, 1, 654321);
    assert_eq!(other.assignment.counts(), counts);
    assert_ne!(other.assignment, first.assignment);
}

#[test]
fn seven_units_one_block_three_conditions() {
    let rows: Vec<Vec<String>> = (0..7)
        .map(|idx| vec![format!("u{idx}"), "block-a".to_string()])
        .collect();
    let roster = Roster::new(vec!["id".into(), "block".into()], rows).unwrap();
    let design = Design::new("id").with_blocks(["block"]);
    for seed in [1u64, 42, 123456, 999_999] {
        let outcome = run(&roster, &design, 2, seed);
        let mut counts: Vec<usize> = outcome.assignment.counts().into_values().collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![2, 2, 3]);
        assert_eq!(outcome.cells.len(), 1);
    }
}

#[test]
fn every_unit_assigned_exactly_once() {
    let roster = classroom_roster();
    let design = Design::new("id").with_blocks(["school"]).with_strata(["grade"]);
    let outcome = run(&roster, &design, 2, 777_777);
    let ids: Vec<&str> = outcome.assignment.units.iter().map(|u| u.unit.as_str()).collect();
    let roster_ids: Vec<&str> = roster.column_values(0).collect();
    assert_eq!(ids, roster_ids);
    assert_eq!(ids.iter().collect::<BTreeSet<_>>().len(), roster.row_count());
}

#[test]
fn balance_holds_within_every_cell() {
    let roster = classroom_roster();
    let design = Design::new("id").with_blocks(["school"]).with_strata(["grade"]);
    let outcome = run(&roster, &design, 1, 314_159);
    assert_eq!(outcome.cells.len(), 4);
    for cell in &outcome.cells {
        let max = cell.counts.values().max().unwrap();
        let min = cell.counts.values().min().unwrap();
        assert!(max - min <= 1, "{:?}", cell);
        assert_eq!(cell.counts.values().sum::<usize>(), cell.size);
    }
    let keys: Vec<Vec<String>> = outcome.cells.iter().map(|c| c.key.parts().to_vec()).collect();
    assert_eq!(
        keys,
        vec![
            vec!["north".to_string(), "3".to_string()],
            vec!["north".to_string(), "4".to_string()],
            vec!["south".to_string(), "3".to_string()],
            vec!["south".to_string(), "4".to_string()],
        ]
    );
}

#[test]
fn recombine_appends_assign_column() {
    let roster = classroom_roster();
    let design = Design::new("id").with_blocks(["school"]);
    let outcome = run(&roster, &design, 1, 123456);
    let table = outcome.recombine(&roster).expect("recombine");
    assert_eq!(table.columns().last().map(String::as_str), Some(ASSIGN_COLUMN));
    for row in 0..roster.row_count() {
        assert_eq!(&table.rows()[row][..4], &roster.rows()[row][..]);
        let unit = roster.value(row, 0);
        assert_eq!(Some(table.value(row, 4)), outcome.assignment.condition_of(unit));
    }
    assert!(outcome.recombine(&ten_units()).is_err());
}

#[test]
fn roster_with_assign_column_is_rejected() {
    let vocab = ConditionVocabulary::for_arms(1).unwrap();
    let mut rng = RngHandle::from_seed(123456);

    let as_identity = roster(&[ASSIGN_COLUMN, "name"], &[&["u0", "x0"], &["u1", "x1"]]);
    let err = assign(&as_identity, &vocab, &Design::new(ASSIGN_COLUMN), &mut rng).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ColumnReuseConflict);
    assert_eq!(err.info().context["column"], ASSIGN_COLUMN);

    let as_attribute = roster(&["id", ASSIGN_COLUMN], &[&["u0", "old"], &["u1", "old"]]);
    let err = assign(&as_attribute, &vocab, &Design::new("id"), &mut rng).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ColumnReuseConflict);

    let plain = roster(&["id"], &[&["u0"], &["u1"]]);
    let outcome = assign(&plain, &vocab, &Design::new("id"), &mut rng).unwrap();
    let table = outcome.recombine(&plain).unwrap();
    assert_eq!(table.columns(), ["id", ASSIGN_COLUMN]);
    assert_eq!(table.value(0, 0), "u0");
    let err = outcome.recombine(&table).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ColumnReuseConflict);
    assert_eq!(outcome.assignment.to_roster().unwrap().columns(), ["id", ASSIGN_COLUMN]);
}

#[test]
fn precondition_failures_are_reported_before_sampling() {
    let vocab = ConditionVocabulary::for_arms(1).unwrap();
    let mut rng = RngHandle::from_seed(1);

    let empty = roster(&["id"], &[]);
    let err = assign(&empty, &vocab, &Design::new("id"), &mut rng).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyRoster);

    let dupes = roster(&["id", "school"], &[&["1", "a"], &["2", "a"], &["1", "b"]]);
    let err = assign(&dupes, &vocab, &Design::new("id"), &mut rng).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateUnitIdentity);
    assert_eq!(err.info().context["unit"], "1");

    let err = assign(&dupes, &vocab, &Design::new("pid"), &mut rng).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownColumnSelector);

    let err = assign(
        &dupes,
        &vocab,
        &Design::new("school").with_strata(["school"]),
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ColumnReuseConflict);

    // none of the failures above may have consumed randomness
    let mut fresh = RngHandle::from_seed(1);
    let ok = assign(&classroom_roster(), &vocab, &Design::new("id"), &mut rng).unwrap();
    let expected = assign(&classroom_roster(), &vocab, &Design::new("id"), &mut fresh).unwrap();
    assert_eq!(ok, expected);
}

#[test]
fn substream_cells_do_not_depend_on_other_cells() {
    let full = classroom_roster();
    let design = Design::new("id").with_blocks(["school"]);
    let vocab = ConditionVocabulary::for_arms(1).unwrap();
    let outcome = assign_substreams(&full, &vocab, &design, 123456).unwrap();

    let south_only = Roster::new(
        full.columns().to_vec(),
        full.rows()
            .iter()
            .filter(|row| row[1] == "south")
            .cloned()
            .collect(),
    )
    .unwrap();
    let partial = assign_substreams(&south_only, &vocab, &design, 123456).unwrap();
    for unit in &partial.assignment.units {
        assert_eq!(
            outcome.assignment.condition_of(&unit.unit),
            Some(unit.condition.as_str())
        );
    }
}

#[test]
fn randomize_uses_committed_seed() {
    let roster = classroom_roster();
    let design = Design::new("id").with_strata(["grade"]);
    let vocab = ConditionVocabulary::for_arms(3).unwrap();
    let mut manager = SeedManager::new(MemorySeedStore::default(), SeedPolicy::default());
    let committed = manager.commit(Seed::new(123456)).unwrap();

    let sequential = randomize(&roster, &vocab, &design, SamplingMode::Sequential, &committed).unwrap();
    let direct = run(&roster, &design, 3, 123456);
    assert_eq!(sequential, direct);

    let per_cell =
        randomize(&roster, &vocab, &design, SamplingMode::PerCellSubstream, &committed).unwrap();
    let direct = assign_substreams(&roster, &vocab, &design, 123456).unwrap();
    assert_eq!(per_cell, direct);
}
