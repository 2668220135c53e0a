use std::error::Error;

use clap::Args;
use refl_exp::{DifferentialEvolutionOptions, Study, Values};
use refl_sim::AngleTime;

use super::{parse_angle_time, parse_values, run_single, StudyArgs};

#[derive(Args, Debug)]
pub struct LogRatiosArgs {
    /// Base measurement; its times are scaled by each multiplier.
    #[arg(
        long = "at",
        value_parser = parse_angle_time,
        default_values = ["0.5:70:1", "1.0:70:4", "2.0:70:16"]
    )]
    pub angle_times: Vec<AngleTime>,
    /// Counting time multipliers.
    #[arg(long, value_parser = parse_values, default_value = "1:50:50")]
    pub times: Values,
    /// Magnetic SLD of the Pt layer in the simulated truth.
    #[arg(long, default_value_t = 0.01)]
    pub pt_mag: f64,
    /// Simulations averaged per time.
    #[arg(long, default_value_t = 1)]
    pub repeats: usize,
    #[command(flatten)]
    pub study: StudyArgs,
}

pub fn run(args: &LogRatiosArgs) -> Result<(), Box<dyn Error>> {
    let study = Study::LogRatios {
        angle_times: args.angle_times.clone(),
        times: args.times.clone(),
        pt_mag: args.pt_mag,
        repeats: args.repeats,
    };
    run_single(
        "log-ratios",
        study,
        &args.study,
        DifferentialEvolutionOptions::default(),
    )
}
