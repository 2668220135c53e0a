//! Gaussian log-likelihood of simulated data under a model.

use refl_core::errors::{ErrorInfo, ReflError};

use crate::model::ReflectModel;
use crate::simulate::SimulatedData;

use std::f64::consts::PI;

/// Gaussian log-likelihood of `data` under `model`.
///
/// Points without an uncertainty carry no information and are skipped.
pub fn log_likelihood(model: &ReflectModel, data: &SimulatedData) -> Result<f64, ReflError> {
    let rows: Vec<_> = data.rows().iter().filter(|row| row.dr > 0.0).collect();
    let q: Vec<f64> = rows.iter().map(|row| row.q).collect();
    let r_model = model.reflectivity(&q)?;
    let logl = rows
        .iter()
        .zip(&r_model)
        .map(|(row, m)| {
            let residual = (row.r - m) / row.dr;
            residual * residual + (2.0 * PI * row.dr * row.dr).ln()
        })
        .sum::<f64>()
        * -0.5;
    if !logl.is_finite() {
        return Err(ReflError::Information(
            ErrorInfo::new("logl-non-finite", "log-likelihood is not finite")
                .with_context("structure", model.structure.name.clone()),
        ));
    }
    Ok(logl)
}

/// Summed log-likelihood of several datasets, each under its own model.
pub fn joint_log_likelihood(
    models: &[ReflectModel],
    datasets: &[SimulatedData],
) -> Result<f64, ReflError> {
    if models.len() != datasets.len() {
        return Err(ReflError::Information(
            ErrorInfo::new("logl-shape", "one dataset is needed per model")
                .with_context("models", models.len().to_string())
                .with_context("datasets", datasets.len().to_string()),
        ));
    }
    models
        .iter()
        .zip(datasets)
        .map(|(model, data)| log_likelihood(model, data))
        .sum()
}
