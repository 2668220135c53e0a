//! Information a planned measurement carries about the parameters of a sample.

use nalgebra::DMatrix;
use refl_core::errors::{ErrorInfo, ReflError};
use refl_core::ParameterSet;
use refl_model::{ContrastSample, Sample, SampleYig, Structure, Underlayer};
use refl_sim::{measurement_points, AngleTime, Conditions, DirectBeam, ReflectModel, SpinChannels};
use tracing::debug;

use crate::fisher::{fisher, Measurements, DEFAULT_STEP};

/// Information on the varying parameters of `sample` measured in a single condition.
pub fn angle_info<S: Sample + ?Sized>(
    sample: &S,
    angle_times: &[AngleTime],
    conditions: Conditions,
    beam: &DirectBeam,
) -> Result<DMatrix<f64>, ReflError> {
    let (q, counts) = measurement_points(angle_times, beam)?;
    let measurements = Measurements::new(vec![q], vec![counts])?;
    let params = sample.parameters();
    fisher(&measurements, params, &params.varying(), DEFAULT_STEP, |p| {
        Ok(vec![ReflectModel::new(sample.structure_with(p)?, conditions)])
    })
}

/// Information from measuring every plan angle in each of `contrasts`.
pub fn contrast_info<S: ContrastSample + ?Sized>(
    sample: &S,
    angle_times: &[AngleTime],
    contrasts: &[f64],
    underlayers: &[Underlayer],
    conditions: Conditions,
    beam: &DirectBeam,
) -> Result<DMatrix<f64>, ReflError> {
    contrast_info_for(
        sample,
        sample.parameters(),
        &sample.parameters().varying(),
        angle_times,
        contrasts,
        underlayers,
        conditions,
        beam,
    )
}

/// [`contrast_info`] with explicit parameter values and parameter selection.
#[allow(clippy::too_many_arguments)]
pub fn contrast_info_for<S: ContrastSample + ?Sized>(
    sample: &S,
    params: &ParameterSet,
    indices: &[usize],
    angle_times: &[AngleTime],
    contrasts: &[f64],
    underlayers: &[Underlayer],
    conditions: Conditions,
    beam: &DirectBeam,
) -> Result<DMatrix<f64>, ReflError> {
    if contrasts.is_empty() {
        return Err(ReflError::Information(
            ErrorInfo::new("contrasts-empty", "at least one contrast is required")
                .with_context("sample", sample.name()),
        ));
    }
    let (q, counts) = measurement_points(angle_times, beam)?;
    let measurements = Measurements::repeated(q, counts, contrasts.len())?;
    fisher(&measurements, params, indices, DEFAULT_STEP, |p| {
        contrasts
            .iter()
            .map(|&contrast| {
                Ok(ReflectModel::new(
                    sample.contrast_structure(p, contrast, underlayers)?,
                    conditions,
                ))
            })
            .collect()
    })
}

/// Information on a contrast sample with `underlayers` beneath it, in its usual conditions.
pub fn underlayer_info<S: ContrastSample + ?Sized>(
    sample: &S,
    angle_times: &[AngleTime],
    contrasts: &[f64],
    underlayers: &[Underlayer],
    beam: &DirectBeam,
) -> Result<DMatrix<f64>, ReflError> {
    contrast_info(
        sample,
        angle_times,
        contrasts,
        underlayers,
        sample.conditions(),
        beam,
    )
}

fn channel_models(
    structure: Structure,
    conditions: Conditions,
    channels: SpinChannels,
) -> Vec<ReflectModel> {
    channels
        .states()
        .into_iter()
        .map(|spin| ReflectModel::new(structure.clone(), conditions).with_spin(spin))
        .collect()
}

/// Information on every varying parameter from a polarised measurement.
pub fn magnetic_info<S: Sample + ?Sized>(
    sample: &S,
    angle_times: &[AngleTime],
    channels: SpinChannels,
    beam: &DirectBeam,
) -> Result<DMatrix<f64>, ReflError> {
    let states = channels.states();
    if states.is_empty() {
        return Err(ReflError::Information(ErrorInfo::new(
            "channels-empty",
            "at least one spin channel must be requested",
        )));
    }
    let (q, counts) = measurement_points(angle_times, beam)?;
    let measurements = Measurements::repeated(q, counts, states.len())?;
    let params = sample.parameters();
    let conditions = sample.conditions();
    fisher(&measurements, params, &params.varying(), DEFAULT_STEP, |p| {
        Ok(channel_models(sample.structure_with(p)?, conditions, channels))
    })
}

/// Information on the platinum magnetic SLD of a YIG sample for given layer thicknesses.
pub trait MagneticUnderlayerInfo {
    /// 1×1 information on `pt_mag` from the `pp` and `mm` channels.
    fn underlayer_info(
        &self,
        angle_times: &[AngleTime],
        yig_thick: f64,
        pt_thick: f64,
        beam: &DirectBeam,
    ) -> Result<DMatrix<f64>, ReflError>;
}

impl MagneticUnderlayerInfo for SampleYig {
    fn underlayer_info(
        &self,
        angle_times: &[AngleTime],
        yig_thick: f64,
        pt_thick: f64,
        beam: &DirectBeam,
    ) -> Result<DMatrix<f64>, ReflError> {
        let params = self.conditions_params(Some(yig_thick), Some(pt_thick))?;
        let channels = SpinChannels::non_spin_flip();
        let (q, counts) = measurement_points(angle_times, beam)?;
        let measurements = Measurements::repeated(q, counts, channels.states().len())?;
        let conditions = self.conditions();
        let g = fisher(
            &measurements,
            &params,
            &[SampleYig::pt_mag_index()],
            DEFAULT_STEP,
            |p| Ok(channel_models(self.structure_with(p)?, conditions, channels)),
        )?;
        debug!(yig_thick, pt_thick, info = g[(0, 0)], "pt_mag information");
        Ok(g)
    }
}
