use std::error::Error;

use clap::Args;
use refl_exp::{DifferentialEvolutionOptions, Study, Values};
use refl_sim::AngleTime;

use super::{parse_angle_time, parse_values, run_single, StudyArgs};

#[derive(Args, Debug)]
pub struct UnderlayerArgs {
    /// Underlayer thicknesses in Å.
    #[arg(long, value_parser = parse_values, default_value = "5:500:50")]
    pub thicknesses: Values,
    /// Underlayer SLDs in 1e-6 Å⁻².
    #[arg(long, value_parser = parse_values, default_value = "1:9:50")]
    pub slds: Values,
    /// Bulk water SLDs the bilayer is measured in.
    #[arg(
        long = "contrast",
        allow_hyphen_values = true,
        default_values_t = [-0.56, 6.36]
    )]
    pub contrasts: Vec<f64>,
    #[arg(
        long = "at",
        value_parser = parse_angle_time,
        default_values = ["0.7:70:10", "2.0:70:40"]
    )]
    pub angle_times: Vec<AngleTime>,
    #[command(flatten)]
    pub study: StudyArgs,
}

pub fn run(args: &UnderlayerArgs) -> Result<(), Box<dyn Error>> {
    let study = Study::Underlayer {
        thicknesses: args.thicknesses.clone(),
        slds: args.slds.clone(),
        contrasts: args.contrasts.clone(),
        angle_times: args.angle_times.clone(),
    };
    run_single(
        "underlayer",
        study,
        &args.study,
        DifferentialEvolutionOptions::default(),
    )
}
