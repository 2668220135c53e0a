use std::error::Error;

use clap::Args;
use refl_exp::{DifferentialEvolutionOptions, Study, Values};

use super::{parse_values, run_single, StudyArgs};

#[derive(Args, Debug)]
pub struct KineticsArgs {
    /// Candidate angles in degrees.
    #[arg(long, value_parser = parse_values, default_value = "0.2:4:50")]
    pub angles: Values,
    /// Candidate bulk water SLDs.
    #[arg(
        long,
        value_parser = parse_values,
        allow_hyphen_values = true,
        default_value = "-0.56:6.36:50"
    )]
    pub contrasts: Values,
    /// Area per molecule values the bilayer passes through.
    #[arg(long, value_parser = parse_values, default_value = "49.9:55.1:20")]
    pub kinetic_values: Values,
    #[arg(long, default_value_t = 70)]
    pub points: usize,
    /// Counting time shared equally between the kinetic values.
    #[arg(long, default_value_t = 1000.0)]
    pub time: f64,
    #[command(flatten)]
    pub study: StudyArgs,
}

pub fn run(args: &KineticsArgs) -> Result<(), Box<dyn Error>> {
    let study = Study::Kinetics {
        angles: args.angles.clone(),
        contrasts: args.contrasts.clone(),
        kinetic_values: args.kinetic_values.clone(),
        points: args.points,
        time: args.time,
    };
    run_single(
        "kinetics",
        study,
        &args.study,
        DifferentialEvolutionOptions::default(),
    )
}
