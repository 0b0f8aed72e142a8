use std::error::Error;

use clap::{Args, Subcommand};
use rl_core::seed::SeedPolicy;

#[derive(Args, Debug)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub action: SeedAction,
}

#[derive(Subcommand, Debug)]
pub enum SeedAction {
    /// Check that text is an acceptable seed.
    Validate {
        /// Candidate seed text.
        seed: String,
        /// Minimum number of digits; 0 accepts any non-negative integer.
        #[arg(long, default_value_t = 6)]
        min_digits: usize,
    },
    /// Draw a fresh seed.
    Generate {
        /// Minimum number of digits of the drawn seed.
        #[arg(long, default_value_t = 6)]
        min_digits: usize,
    },
}

pub fn run(args: &SeedArgs) -> Result<(), Box<dyn Error>> {
    match &args.action {
        SeedAction::Validate { seed, min_digits } => {
            let policy = SeedPolicy {
                min_digits: *min_digits,
            };
            let seed = policy.parse(seed)?;
            println!("{seed}");
        }
        SeedAction::Generate { min_digits } => {
            let policy = SeedPolicy {
                min_digits: *min_digits,
            };
            println!("{}", policy.generate()?);
        }
    }
    Ok(())
}
