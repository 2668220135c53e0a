use std::error::Error;

use clap::Args;
use refl_exp::{DifferentialEvolutionOptions, Study, Values};
use refl_sim::AngleTime;

use super::{parse_angle_time, parse_values, run_single, StudyArgs};

#[derive(Args, Debug)]
pub struct MagneticSweepArgs {
    /// YIG thicknesses in Å, as `start:stop:num` or a list.
    #[arg(long, value_parser = parse_values, default_value = "400:900:26")]
    pub yig_thicks: Values,
    /// Pt thicknesses in Å, as `start:stop:num` or a list.
    #[arg(long, value_parser = parse_values, default_value = "20:100:21")]
    pub pt_thicks: Values,
    #[arg(
        long = "at",
        value_parser = parse_angle_time,
        default_values = ["0.5:70:20", "1.0:70:80", "2.0:70:320"]
    )]
    pub angle_times: Vec<AngleTime>,
    #[command(flatten)]
    pub study: StudyArgs,
}

pub fn run(args: &MagneticSweepArgs) -> Result<(), Box<dyn Error>> {
    let study = Study::MagneticSweep {
        yig_thicks: args.yig_thicks.clone(),
        pt_thicks: args.pt_thicks.clone(),
        angle_times: args.angle_times.clone(),
    };
    run_single(
        "magnetic-sweep",
        study,
        &args.study,
        DifferentialEvolutionOptions::default(),
    )
}
