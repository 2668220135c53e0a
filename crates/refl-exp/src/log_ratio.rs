//! Evidence for a magnetic Pt layer as a function of counting time.

use refl_core::errors::{ErrorInfo, ReflError};
use refl_core::RngHandle;
use refl_model::{Sample, SampleYig};
use refl_sim::{joint_log_likelihood, simulate_magnetic, AngleTime, DirectBeam, ReflectModel, SpinChannels};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::sweep::Series;

/// Mean log-likelihood ratio for each counting time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRatios {
    /// Platinum magnetic SLD of the magnetic model.
    pub pt_mag: f64,
    /// Simulations averaged for each time.
    pub repeats: usize,
    /// Multipliers applied to the template counting times.
    pub times: Vec<f64>,
    /// Mean ratio at each time.
    pub ratios: Vec<f64>,
}

impl LogRatios {
    /// Ratio against counting time, for plotting and export.
    pub fn to_series(&self) -> Series {
        Series {
            x_label: "Time (s)".to_string(),
            y_label: "Log Ratio".to_string(),
            x: self.times.clone(),
            values: self.ratios.clone(),
        }
    }
}

/// Log-likelihood ratio of a magnetic Pt layer against a non-magnetic one.
///
/// For every entry of `times` the counting times of `template` are multiplied
/// by it, `pp` and `mm` data are simulated with the Pt magnetic SLD set to
/// `pt_mag`, and `logl(pt_mag) - logl(0)` is averaged over `repeats` datasets.
/// The sample is not modified.
pub fn calc_log_ratios(
    yig: &SampleYig,
    template: &[AngleTime],
    times: &[f64],
    pt_mag: f64,
    repeats: usize,
    seed: u64,
    beam: &DirectBeam,
) -> Result<LogRatios, ReflError> {
    if repeats == 0 {
        return Err(ReflError::Design(ErrorInfo::new(
            "repeats-zero",
            "at least one simulated dataset is needed per time",
        )));
    }
    let mut magnetic = yig.clone();
    magnetic.set_pt_mag(pt_mag)?;
    let structure = magnetic.structure()?;
    let mut plain = yig.clone();
    plain.set_pt_mag(0.0)?;
    let plain_structure = plain.structure()?;
    let conditions = yig.conditions();
    let channels = SpinChannels::non_spin_flip();

    let mut ratios = Vec::with_capacity(times.len());
    for (idx, &time) in times.iter().enumerate() {
        let plan: Vec<AngleTime> = template
            .iter()
            .map(|at| AngleTime::new(at.angle, at.points, at.time * time))
            .collect();
        let mut rng = RngHandle::substream(seed, idx as u64);
        let mut total = 0.0;
        for _ in 0..repeats {
            let (models, datasets) =
                simulate_magnetic(&structure, &plan, conditions, beam, channels, &mut rng)?;
            let plain_models: Vec<ReflectModel> = models
                .iter()
                .map(|model| ReflectModel::new(plain_structure.clone(), conditions).with_spin(model.spin))
                .collect();
            total += joint_log_likelihood(&models, &datasets)?
                - joint_log_likelihood(&plain_models, &datasets)?;
        }
        let ratio = total / repeats as f64;
        debug!(time, ratio, "log ratio");
        if idx % 10 == 0 {
            info!(">>> {}/{}", idx, times.len());
        }
        ratios.push(ratio);
    }
    Ok(LogRatios {
        pt_mag,
        repeats,
        times: times.to_vec(),
        ratios,
    })
}
