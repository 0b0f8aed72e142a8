use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rl_assign::RunConfig;
use rl_io::{read_roster, summarize_design};

use super::DesignArgs;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Roster CSV with a header row.
    #[arg(long)]
    pub roster: PathBuf,
    /// Optional YAML run configuration supplying the design.
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[command(flatten)]
    pub design: DesignArgs,
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let design = args.design.apply(config.design);
    let roster = read_roster(&args.roster)?;
    let summary = summarize_design(&roster, &design)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Rows: {}", roster.row_count());
        for column in &summary {
            println!("{column}");
        }
    }
    Ok(())
}
