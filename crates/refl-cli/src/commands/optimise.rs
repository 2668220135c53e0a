use std::error::Error;

use clap::{Args, Subcommand};
use refl_exp::{DifferentialEvolutionOptions, Scheduler, Study, Values};
use refl_sim::AngleTime;

use super::{parse_angle_time, parse_bounds, parse_values, run_single, StudyArgs};

#[derive(Args, Debug)]
pub struct OptimiseArgs {
    #[command(subcommand)]
    pub design: Design,
    /// Population size per optimised variable.
    #[arg(long, global = true, default_value_t = 15)]
    pub popsize: usize,
    #[arg(long, global = true, default_value_t = 1000)]
    pub max_generations: usize,
    /// Relative convergence tolerance on the population spread.
    #[arg(long, global = true, default_value_t = 0.001)]
    pub tol: f64,
}

#[derive(Subcommand, Debug)]
pub enum Design {
    /// Angles and the split of a fixed total counting time.
    AngleTimes(AngleTimesArgs),
    /// Thicknesses and SLDs of underlayers beneath the DMPC bilayer.
    Underlayers(UnderlayersArgs),
    /// Angle and contrast of a kinetic bilayer experiment.
    Kinetics(OptimiseKineticsArgs),
    /// YIG and Pt thicknesses of the magnetic sample.
    YigThickness(YigThicknessArgs),
}

#[derive(Args, Debug)]
pub struct AngleTimesArgs {
    #[arg(long)]
    pub sample: String,
    #[arg(long = "contrast", allow_hyphen_values = true)]
    pub contrasts: Vec<f64>,
    #[arg(long, default_value_t = 2)]
    pub num_angles: usize,
    #[arg(long, value_parser = parse_bounds, default_value = "0.2:4")]
    pub angle_bounds: (f64, f64),
    #[arg(long, default_value_t = 100)]
    pub points: usize,
    #[arg(long, default_value_t = 1000.0)]
    pub total_time: f64,
    #[command(flatten)]
    pub study: StudyArgs,
}

#[derive(Args, Debug)]
pub struct UnderlayersArgs {
    #[arg(long, default_value_t = 1)]
    pub num_underlayers: usize,
    #[arg(
        long = "at",
        value_parser = parse_angle_time,
        default_values = ["0.7:70:10", "2.0:70:40"]
    )]
    pub angle_times: Vec<AngleTime>,
    #[arg(
        long = "contrast",
        allow_hyphen_values = true,
        default_values_t = [-0.56, 6.36]
    )]
    pub contrasts: Vec<f64>,
    #[arg(long, value_parser = parse_bounds, default_value = "5:500")]
    pub thick_bounds: (f64, f64),
    #[arg(long, value_parser = parse_bounds, default_value = "1:9")]
    pub sld_bounds: (f64, f64),
    #[command(flatten)]
    pub study: StudyArgs,
}

#[derive(Args, Debug)]
pub struct OptimiseKineticsArgs {
    #[arg(long, value_parser = parse_bounds, default_value = "0.2:4")]
    pub angle_bounds: (f64, f64),
    #[arg(
        long,
        value_parser = parse_bounds,
        allow_hyphen_values = true,
        default_value = "-0.56:6.36"
    )]
    pub contrast_bounds: (f64, f64),
    #[arg(long, value_parser = parse_values, default_value = "49.9:55.1:20")]
    pub kinetic_values: Values,
    #[arg(long, default_value_t = 70)]
    pub points: usize,
    #[arg(long, default_value_t = 1000.0)]
    pub time: f64,
    #[command(flatten)]
    pub study: StudyArgs,
}

#[derive(Args, Debug)]
pub struct YigThicknessArgs {
    #[arg(
        long = "at",
        value_parser = parse_angle_time,
        default_values = ["0.5:70:20", "1.0:70:80", "2.0:70:320"]
    )]
    pub angle_times: Vec<AngleTime>,
    #[arg(long, value_parser = parse_bounds, default_value = "400:900")]
    pub yig_bounds: (f64, f64),
    #[arg(long, value_parser = parse_bounds, default_value = "20:100")]
    pub pt_bounds: (f64, f64),
    #[command(flatten)]
    pub study: StudyArgs,
}

pub fn run(args: &OptimiseArgs) -> Result<(), Box<dyn Error>> {
    let (study, common) = match &args.design {
        Design::AngleTimes(design) => (
            Study::OptimiseAngleTimes {
                sample: design.sample.clone(),
                contrasts: design.contrasts.clone(),
                num_angles: design.num_angles,
                angle_bounds: design.angle_bounds,
                points: design.points,
                total_time: design.total_time,
            },
            &design.study,
        ),
        Design::Underlayers(design) => (
            Study::OptimiseUnderlayers {
                num_underlayers: design.num_underlayers,
                angle_times: design.angle_times.clone(),
                contrasts: design.contrasts.clone(),
                thick_bounds: design.thick_bounds,
                sld_bounds: design.sld_bounds,
            },
            &design.study,
        ),
        Design::Kinetics(design) => (
            Study::OptimiseKinetics {
                angle_bounds: design.angle_bounds,
                contrast_bounds: design.contrast_bounds,
                kinetic_values: design.kinetic_values.clone(),
                points: design.points,
                time: design.time,
            },
            &design.study,
        ),
        Design::YigThickness(design) => (
            Study::OptimiseYigThickness {
                angle_times: design.angle_times.clone(),
                yig_bounds: design.yig_bounds,
                pt_bounds: design.pt_bounds,
            },
            &design.study,
        ),
    };
    let options = DifferentialEvolutionOptions {
        popsize: args.popsize,
        max_generations: args.max_generations,
        tol: args.tol,
        scheduler: Scheduler::parallel(common.threads),
        ..DifferentialEvolutionOptions::default()
    };
    let name = study.label();
    run_single(name, study, common, options)
}
