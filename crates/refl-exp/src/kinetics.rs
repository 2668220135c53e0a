//! Measurement choice for kinetic experiments, where one parameter changes during the run.

use refl_core::errors::{ErrorInfo, ReflError};
use refl_info::contrast_info_for;
use refl_model::ContrastSample;
use refl_sim::{AngleTime, DirectBeam};

use crate::sweep::{grid_2d, Grid2D, Scheduler};

fn kinetic_index<S: ContrastSample + ?Sized>(sample: &S) -> Result<usize, ReflError> {
    sample.kinetic_parameter().ok_or_else(|| {
        ReflError::Design(
            ErrorInfo::new("kinetic-parameter", "sample has no kinetic parameter")
                .with_context("sample", sample.name()),
        )
    })
}

/// Information on the kinetic parameter summed over `kinetic_values`.
///
/// The counting `time` is shared equally between the values, as if the
/// parameter passed through each of them during one measurement.
pub fn kinetic_information<S: ContrastSample + ?Sized>(
    sample: &S,
    angle: f64,
    contrast_sld: f64,
    kinetic_values: &[f64],
    points: usize,
    time: f64,
    beam: &DirectBeam,
) -> Result<f64, ReflError> {
    let idx = kinetic_index(sample)?;
    if kinetic_values.is_empty() {
        return Err(ReflError::Design(ErrorInfo::new(
            "kinetic-values",
            "at least one kinetic parameter value is required",
        )));
    }
    let angle_times = [AngleTime::new(angle, points, time / kinetic_values.len() as f64)];
    let mut params = sample.parameters().clone();
    let mut information = 0.0;
    for &value in kinetic_values {
        params.set_value(idx, value)?;
        let g = contrast_info_for(
            sample,
            &params,
            &[idx],
            &angle_times,
            &[contrast_sld],
            &[],
            sample.conditions(),
            beam,
        )?;
        information += g[(0, 0)];
    }
    Ok(information)
}

/// Kinetic information over a contrast × angle grid.
#[allow(clippy::too_many_arguments)]
pub fn kinetics<S: ContrastSample + ?Sized>(
    sample: &S,
    angles: &[f64],
    contrasts: &[f64],
    kinetic_values: &[f64],
    points: usize,
    time: f64,
    beam: &DirectBeam,
    scheduler: &Scheduler,
) -> Result<Grid2D, ReflError> {
    kinetic_index(sample)?;
    grid_2d(
        scheduler,
        ("Contrast SLD (10⁻⁶ Å⁻²)", "Angle (°)", "Fisher Information"),
        contrasts,
        angles,
        |contrast, angle| {
            kinetic_information(sample, angle, contrast, kinetic_values, points, time, beam)
        },
    )
}
