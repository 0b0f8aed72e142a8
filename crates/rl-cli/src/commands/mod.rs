pub mod inspect;
pub mod labels;
pub mod randomize;
pub mod seed;

use clap::Args;
use rl_assign::Design;

/// Column selection shared by `inspect` and `randomize`.
#[derive(Args, Debug, Clone, Default)]
pub struct DesignArgs {
    /// Column holding the unique identity of each randomization unit.
    #[arg(long)]
    pub unit: Option<String>,
    /// Blocking column; repeat for several.
    #[arg(long = "block", value_name = "COLUMN")]
    pub blocks: Vec<String>,
    /// Stratification column; repeat for several.
    #[arg(long = "strata", value_name = "COLUMN")]
    pub strata: Vec<String>,
}

impl DesignArgs {
    /// Applies the flags on top of a configured design.
    pub fn apply(&self, mut design: Design) -> Design {
        if let Some(unit) = &self.unit {
            design.unit_column = unit.clone();
        }
        if !self.blocks.is_empty() {
            design.block_columns = self.blocks.clone();
        }
        if !self.strata.is_empty() {
            design.strata_columns = self.strata.clone();
        }
        design
    }
}
