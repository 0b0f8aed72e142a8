use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rl_assign::ConditionVocabulary;
use rl_io::{build_label_sheets, merge_assignment, read_assignment, read_roster, write_label_sheets};

#[derive(Args, Debug)]
pub struct LabelsArgs {
    /// Roster CSV with a header row.
    #[arg(long)]
    pub roster: PathBuf,
    /// Assignment file written by `randomize`.
    #[arg(long)]
    pub assignment: PathBuf,
    /// Column printed on each label; repeat for several lines.
    #[arg(long = "label", value_name = "COLUMN", required = true)]
    pub labels: Vec<String>,
    /// Sheet order, e.g. `--conditions C,T`; first-seen order otherwise.
    #[arg(long, value_delimiter = ',')]
    pub conditions: Vec<String>,
    /// Output directory for the label sheets.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// File name prefix of each sheet.
    #[arg(long, default_value = "assignmentlabels_")]
    pub prefix: String,
}

pub fn run(args: &LabelsArgs) -> Result<(), Box<dyn Error>> {
    let roster = read_roster(&args.roster)?;
    let saved = read_assignment(&args.assignment)?;
    let merged = merge_assignment(&roster, &saved)?;
    let vocabulary = if args.conditions.is_empty() {
        None
    } else {
        Some(ConditionVocabulary::from_labels(args.conditions.clone())?)
    };

    let sheets = build_label_sheets(
        &merged.roster,
        &merged.conditions,
        &args.labels,
        vocabulary.as_ref(),
    )?;
    for path in write_label_sheets(&args.out, &args.prefix, &sheets)? {
        println!("{}", path.display());
    }
    Ok(())
}
