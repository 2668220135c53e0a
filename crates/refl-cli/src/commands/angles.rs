use std::error::Error;

use clap::Args;
use refl_exp::{DifferentialEvolutionOptions, Study, Values};
use refl_sim::AngleTime;

use super::{parse_angle_time, parse_values, run_single, StudyArgs};

#[derive(Args, Debug)]
pub struct AnglesArgs {
    #[arg(long)]
    pub sample: String,
    /// Bulk water SLDs to measure in, for samples measured in contrasts.
    #[arg(long = "contrast", allow_hyphen_values = true)]
    pub contrasts: Vec<f64>,
    /// Measurements already planned, as `angle:points:time`.
    #[arg(long = "initial", value_parser = parse_angle_time)]
    pub initial: Vec<AngleTime>,
    /// Candidate angles in degrees.
    #[arg(long, value_parser = parse_values, default_value = "0.2:4:500")]
    pub angles: Values,
    #[arg(long, default_value_t = 70)]
    pub points: usize,
    /// Counting time of the added angle.
    #[arg(long, default_value_t = 100.0)]
    pub time: f64,
    #[command(flatten)]
    pub study: StudyArgs,
}

pub fn run(args: &AnglesArgs) -> Result<(), Box<dyn Error>> {
    let study = Study::Angles {
        sample: args.sample.clone(),
        contrasts: args.contrasts.clone(),
        initial: args.initial.clone(),
        angles: args.angles.clone(),
        points: args.points,
        time: args.time,
    };
    run_single(
        "angles",
        study,
        &args.study,
        DifferentialEvolutionOptions::default(),
    )
}
