use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use refl_exp::{to_canonical_json_bytes, LibrarySample};
use refl_info::FisherSummary;
use refl_sim::AngleTime;

use super::{load_beam, parse_angle_time};

#[derive(Args, Debug)]
pub struct FisherArgs {
    #[arg(long)]
    pub sample: String,
    /// Measurement as `angle:points:time`; repeat for several angles.
    #[arg(long = "at", required = true, value_parser = parse_angle_time)]
    pub angle_times: Vec<AngleTime>,
    /// Bulk water SLDs to measure in; the sample's usual conditions when omitted.
    #[arg(long = "contrast", allow_hyphen_values = true)]
    pub contrasts: Vec<f64>,
    #[arg(long)]
    pub beam: Option<PathBuf>,
    /// Write the summary here instead of standard output.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &FisherArgs) -> Result<(), Box<dyn Error>> {
    let beam = load_beam(args.beam.as_deref())?;
    let library = LibrarySample::load(&args.sample)?;
    let target = library.target(&args.contrasts)?;
    let g = target.information(&args.angle_times, &beam)?;
    let params = library.as_sample().parameters();
    let summary = FisherSummary::new(params.names(&params.varying()), &g);
    let bytes = to_canonical_json_bytes(&summary)?;
    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, bytes)?;
        }
        None => println!("{}", String::from_utf8(bytes)?),
    }
    Ok(())
}
