use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use refl_exp::LibrarySample;
use refl_plot::{plot_reflectivity_profile, plot_sld_profile, ProfileOptions};

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Library sample to plot; every library sample when omitted.
    #[arg(long)]
    pub sample: Option<String>,
    /// Output directory; figures land in `<out>/<sample name>/`.
    #[arg(long)]
    pub out: PathBuf,
    #[arg(long, default_value_t = 0.005)]
    pub q_min: f64,
    #[arg(long, default_value_t = 0.4)]
    pub q_max: f64,
    #[arg(long, default_value_t = 500)]
    pub points: usize,
    /// Background level of the model reflectivity.
    #[arg(long, default_value_t = 1e-7)]
    pub bkg: f64,
    /// Resolution as a percentage dQ/Q.
    #[arg(long, default_value_t = 2.0)]
    pub dq: f64,
}

pub fn run(args: &ProfileArgs) -> Result<(), Box<dyn Error>> {
    let names: Vec<String> = match &args.sample {
        Some(name) => vec![name.clone()],
        None => LibrarySample::names().into_iter().map(String::from).collect(),
    };
    let options = ProfileOptions {
        q_min: args.q_min,
        q_max: args.q_max,
        points: args.points,
        bkg: args.bkg,
        dq: args.dq,
        ..ProfileOptions::default()
    };
    for name in &names {
        let library = LibrarySample::load(name)?;
        let sample = library.as_sample();
        let sld = plot_sld_profile(sample, &args.out)?;
        let refl = plot_reflectivity_profile(sample, &args.out, &options)?;
        println!("{name}: {} {}", sld.display(), refl.display());
    }
    Ok(())
}
