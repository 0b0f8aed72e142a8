use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use rl_assign::{prepare, randomize, ConditionVocabulary, RunConfig, RunManifest, SamplingMode};
use rl_core::seed::{FileSeedStore, Seed, SeedManager};
use rl_io::{build_label_sheets, read_roster, summarize_design, write_assignment, write_label_sheets};
use tracing::{debug, info};

use super::DesignArgs;
use crate::write_json;

#[derive(Args, Debug)]
pub struct RandomizeArgs {
    /// Roster CSV with a header row.
    #[arg(long)]
    pub roster: PathBuf,
    /// YAML run configuration; flags override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub design: DesignArgs,
    /// Number of treatment arms besides control.
    #[arg(long)]
    pub arms: Option<i64>,
    /// Explicit condition labels in order, e.g. `--conditions C,T`.
    #[arg(long, value_delimiter = ',')]
    pub conditions: Vec<String>,
    /// Seed text; reuses the stored seed or draws a new one when omitted.
    #[arg(long)]
    pub seed: Option<String>,
    /// Minimum number of seed digits; 0 disables the check.
    #[arg(long)]
    pub min_seed_digits: Option<usize>,
    /// `sequential` or `per-cell-substream`.
    #[arg(long, value_parser = parse_sampling)]
    pub sampling: Option<SamplingMode>,
    /// Column printed on each label; repeat for several lines.
    #[arg(long = "label", value_name = "COLUMN")]
    pub labels: Vec<String>,
    /// Output directory for the assignment, seed, manifest and labels.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Replace a different seed already stored in the output directory.
    #[arg(long)]
    pub overwrite_seed: bool,
}

fn parse_sampling(text: &str) -> Result<SamplingMode, String> {
    match text {
        "sequential" => Ok(SamplingMode::Sequential),
        "per-cell-substream" => Ok(SamplingMode::PerCellSubstream),
        other => Err(format!(
            "unknown sampling mode `{other}` (expected sequential or per-cell-substream)"
        )),
    }
}

fn resolve_config(args: &RandomizeArgs) -> Result<RunConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    config.design = args.design.apply(config.design);
    if let Some(arms) = args.arms {
        config.treatment_arms = arms;
        config.conditions = None;
    }
    if !args.conditions.is_empty() {
        config.conditions = Some(ConditionVocabulary::from_labels(args.conditions.clone())?);
    }
    if let Some(sampling) = args.sampling {
        config.sampling = sampling;
    }
    if let Some(digits) = args.min_seed_digits {
        config.seed_policy.policy.min_digits = digits;
    }
    if !args.labels.is_empty() {
        config.labels.columns = args.labels.clone();
    }
    Ok(config)
}

pub fn run(args: &RandomizeArgs) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(args)?;
    let vocabulary = config.vocabulary()?;
    let roster = read_roster(&args.roster)?;

    // Reject bad inputs before a seed is written anywhere.
    prepare(&roster, &config.design)?;
    for column in summarize_design(&roster, &config.design)? {
        info!(
            column = %column.column,
            role = %column.role,
            unique = column.unique_count,
            "column review"
        );
        debug!("\n{column}");
    }
    for column in &config.labels.columns {
        roster.require_column(column, "label")?;
    }

    fs::create_dir_all(&args.out)?;
    let store = FileSeedStore::new(args.out.join(&config.output.seed_file))
        .overwriting(args.overwrite_seed);
    let mut manager = SeedManager::new(store, config.seed_policy.policy.clone());
    let seed = if args.seed.is_some() {
        manager.resolve(args.seed.as_deref())?
    } else if let Some(value) = config.seed_policy.seed {
        Seed::new(value)
    } else if let Some(stored) = manager.recall()? {
        info!(seed = %stored, path = %manager.store().path().display(), "reusing stored seed");
        stored
    } else {
        manager.resolve(None)?
    };
    let committed = manager.commit(seed)?;

    let outcome = randomize(
        &roster,
        &vocabulary,
        &config.design,
        config.sampling,
        &committed,
    )?;

    write_assignment(
        &args.out.join(&config.output.assignment_file),
        &outcome.assignment,
    )?;
    let manifest = RunManifest::build(
        &roster,
        &vocabulary,
        &config.design,
        config.sampling,
        committed.seed(),
        &outcome,
    )?;
    manifest.write(&args.out.join(&config.output.manifest_file))?;
    write_json(args.out.join("run_config.json"), &config)?;

    if !config.labels.columns.is_empty() {
        let conditions: Vec<Option<String>> = outcome
            .assignment
            .units
            .iter()
            .map(|unit| Some(unit.condition.clone()))
            .collect();
        let sheets =
            build_label_sheets(&roster, &conditions, &config.labels.columns, Some(&vocabulary))?;
        write_label_sheets(&args.out, &config.output.label_prefix, &sheets)?;
    }

    println!("seed: {}", committed.seed());
    for (condition, count) in outcome.assignment.counts() {
        println!("{condition}: {count}");
    }
    Ok(())
}
