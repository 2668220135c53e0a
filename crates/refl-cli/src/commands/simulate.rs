use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use refl_core::RngHandle;
use refl_exp::LibrarySample;
use refl_plot::{plot_reflectivity, write_data_csv};
use refl_sim::{joint_log_likelihood, simulate, simulate_magnetic, AngleTime, SpinChannels};

use super::{load_beam, parse_angle_time};

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[arg(long)]
    pub sample: String,
    /// Measurement as `angle:points:time`; repeat for several angles.
    #[arg(long = "at", required = true, value_parser = parse_angle_time)]
    pub angle_times: Vec<AngleTime>,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    #[arg(long)]
    pub beam: Option<PathBuf>,
    /// Also simulate the spin-flip channels of magnetic samples.
    #[arg(long)]
    pub spin_flip: bool,
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &SimulateArgs) -> Result<(), Box<dyn Error>> {
    let beam = load_beam(args.beam.as_deref())?;
    let library = LibrarySample::load(&args.sample)?;
    let sample = library.as_sample();
    let structure = sample.structure()?;
    let mut rng = RngHandle::from_seed(args.seed);

    let (models, datasets) = if structure.is_magnetic() {
        let channels = if args.spin_flip {
            SpinChannels::all()
        } else {
            SpinChannels::non_spin_flip()
        };
        simulate_magnetic(
            &structure,
            &args.angle_times,
            sample.conditions(),
            &beam,
            channels,
            &mut rng,
        )?
    } else {
        let (model, data) = simulate(
            &structure,
            &args.angle_times,
            sample.conditions(),
            &beam,
            &mut rng,
        )?;
        (vec![model], vec![data])
    };

    let dir = args.out.join(sample.name());
    for (model, data) in models.iter().zip(&datasets) {
        let path = dir.join(format!("data_{}.csv", model.spin.label()));
        write_data_csv(data, &path)?;
    }
    let figure = plot_reflectivity(&models, &datasets, &dir, "simulated_data")?;
    let logl = joint_log_likelihood(&models, &datasets)?;
    println!(
        "{}: {} points, log-likelihood {:.3}, figure {}",
        sample.name(),
        datasets.iter().map(|d| d.len()).sum::<usize>(),
        logl,
        figure.display()
    );
    Ok(())
}
