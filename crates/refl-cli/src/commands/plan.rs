use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use refl_exp::{load_plan, run_plan};

use super::persist;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// YAML design plan.
    #[arg(long)]
    pub plan: PathBuf,
    /// Override the plan's master seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the plan's worker thread count.
    #[arg(long)]
    pub threads: Option<usize>,
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &PlanArgs) -> Result<(), Box<dyn Error>> {
    let mut plan = load_plan(&args.plan)?;
    if let Some(seed) = args.seed {
        plan.seed = seed;
    }
    if let Some(threads) = args.threads {
        plan.scheduler.parallelism = threads;
    }
    fs::create_dir_all(&args.out)?;
    let report = run_plan(&plan)?;
    persist(&report, &args.out)?;
    // Persist the resolved plan next to its report for reproducibility.
    fs::write(args.out.join("plan.yaml"), plan.to_yaml_string()?)?;
    Ok(())
}
