use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    angles::{self, AnglesArgs},
    fisher::{self, FisherArgs},
    kinetics::{self, KineticsArgs},
    log_ratios::{self, LogRatiosArgs},
    magnetic_sweep::{self, MagneticSweepArgs},
    optimise::{self, OptimiseArgs},
    plan::{self, PlanArgs},
    profile::{self, ProfileArgs},
    simulate::{self, SimulateArgs},
    underlayer::{self, UnderlayerArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "refl", about = "Neutron reflectometry experimental design CLI")]
struct Cli {
    /// Emit debug events; otherwise `RUST_LOG` or `info` is used.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot SLD and model reflectivity profiles of library samples.
    Profile(ProfileArgs),
    /// Simulate a measurement of a library sample and write the data.
    Simulate(SimulateArgs),
    /// Summarise the Fisher information of a measurement plan.
    Fisher(FisherArgs),
    /// Pt magnetic SLD information over YIG and Pt thicknesses.
    MagneticSweep(MagneticSweepArgs),
    /// Underlayer thickness and SLD choice beneath the DMPC bilayer.
    Underlayer(UnderlayerArgs),
    /// Information gained by adding each candidate angle to a plan.
    Angles(AnglesArgs),
    /// Angle and contrast choice for a kinetic bilayer experiment.
    Kinetics(KineticsArgs),
    /// Log-likelihood ratio of a magnetic Pt layer over counting time.
    LogRatios(LogRatiosArgs),
    /// Optimise a design with differential evolution.
    Optimise(OptimiseArgs),
    /// Execute every study of a YAML design plan.
    Plan(PlanArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Profile(args) => profile::run(&args),
        Command::Simulate(args) => simulate::run(&args),
        Command::Fisher(args) => fisher::run(&args),
        Command::MagneticSweep(args) => magnetic_sweep::run(&args),
        Command::Underlayer(args) => underlayer::run(&args),
        Command::Angles(args) => angles::run(&args),
        Command::Kinetics(args) => kinetics::run(&args),
        Command::LogRatios(args) => log_ratios::run(&args),
        Command::Optimise(args) => optimise::run(&args),
        Command::Plan(args) => plan::run(&args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
