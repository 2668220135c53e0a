//! Fisher information of a set of reflectivity datasets.

use nalgebra::DMatrix;
use refl_core::errors::{ErrorInfo, ReflError};
use refl_core::ParameterSet;
use refl_sim::ReflectModel;
use tracing::trace;

/// Relative step used for the finite-difference gradients.
pub const DEFAULT_STEP: f64 = 0.005;

/// Q values and incident counts of every dataset entering a calculation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    /// Q values of each dataset.
    pub qs: Vec<Vec<f64>>,
    /// Incident counts at each Q, matching `qs`.
    pub counts: Vec<Vec<f64>>,
}

impl Measurements {
    /// Checks that every dataset has as many counts as Q values.
    pub fn new(qs: Vec<Vec<f64>>, counts: Vec<Vec<f64>>) -> Result<Self, ReflError> {
        if qs.len() != counts.len() {
            return Err(shape_error("datasets", qs.len(), counts.len()));
        }
        for (q, c) in qs.iter().zip(&counts) {
            if q.len() != c.len() {
                return Err(shape_error("points", q.len(), c.len()));
            }
        }
        Ok(Self { qs, counts })
    }

    /// The same points repeated for `n` datasets.
    pub fn repeated(q: Vec<f64>, counts: Vec<f64>, n: usize) -> Result<Self, ReflError> {
        Self::new(vec![q; n], vec![counts; n])
    }

    /// Number of datasets.
    pub fn datasets(&self) -> usize {
        self.qs.len()
    }

    /// Number of points over all datasets.
    pub fn total_points(&self) -> usize {
        self.qs.iter().map(Vec::len).sum()
    }
}

fn shape_error(what: &str, q: usize, counts: usize) -> ReflError {
    ReflError::Information(
        ErrorInfo::new("fisher-shape", format!("mismatched {what} between Q and counts"))
            .with_context("q", q.to_string())
            .with_context("counts", counts.to_string()),
    )
}

/// Perturbed values `(x1, x2)` around `value` for the parameter at `idx`.
///
/// A zero value cannot be scaled, so the step becomes absolute and is taken
/// relative to the bound width when the parameter is bounded.
fn perturbation(params: &ParameterSet, idx: usize, step: f64) -> Result<(f64, f64), ReflError> {
    let param = params.get(idx)?;
    let x = param.value;
    if x == 0.0 {
        let delta = param.bound_width().filter(|w| *w > 0.0).unwrap_or(1.0) * step;
        Ok((x - delta, x + delta))
    } else {
        Ok((x * (1.0 - step), x * (1.0 + step)))
    }
}

fn evaluate<F>(
    measurements: &Measurements,
    params: &ParameterSet,
    models_fn: &F,
) -> Result<Vec<f64>, ReflError>
where
    F: Fn(&ParameterSet) -> Result<Vec<ReflectModel>, ReflError>,
{
    let models = models_fn(params)?;
    if models.len() != measurements.datasets() {
        return Err(ReflError::Information(
            ErrorInfo::new("fisher-models", "one model is needed per dataset")
                .with_context("models", models.len().to_string())
                .with_context("datasets", measurements.datasets().to_string()),
        ));
    }
    let mut r = Vec::with_capacity(measurements.total_points());
    for (model, q) in models.iter().zip(&measurements.qs) {
        r.extend(model.reflectivity(q)?);
    }
    Ok(r)
}

/// Fisher information matrix `g = Jᵀ M J` of the parameters at `indices`.
///
/// `models_fn` rebuilds one model per dataset from a parameter set; the
/// Jacobian `J` is obtained with central differences of relative size
/// `step` and `M` is diagonal with entries `counts / R`.
pub fn fisher<F>(
    measurements: &Measurements,
    params: &ParameterSet,
    indices: &[usize],
    step: f64,
    models_fn: F,
) -> Result<DMatrix<f64>, ReflError>
where
    F: Fn(&ParameterSet) -> Result<Vec<ReflectModel>, ReflError>,
{
    let m = indices.len();
    if m == 0 {
        return Ok(DMatrix::zeros(0, 0));
    }
    if !(step > 0.0 && step < 1.0) {
        return Err(ReflError::Information(
            ErrorInfo::new("fisher-step", "step must lie in (0, 1)")
                .with_context("step", step.to_string()),
        ));
    }

    let r = evaluate(measurements, params, &models_fn)?;
    let n = r.len();
    let mut jacobian = DMatrix::<f64>::zeros(n, m);
    for (col, &idx) in indices.iter().enumerate() {
        let (x1, x2) = perturbation(params, idx, step)?;
        let mut perturbed = params.clone();
        perturbed.set_value(idx, x1)?;
        let r1 = evaluate(measurements, &perturbed, &models_fn)?;
        perturbed.set_value(idx, x2)?;
        let r2 = evaluate(measurements, &perturbed, &models_fn)?;
        for row in 0..n {
            jacobian[(row, col)] = (r2[row] - r1[row]) / (x2 - x1);
        }
        trace!(parameter = idx, x1, x2, "gradient column");
    }

    let counts = measurements.counts.iter().flatten();
    let mut weighted = jacobian.clone();
    for (row, (&c, &ri)) in counts.zip(&r).enumerate() {
        let w = c / ri;
        weighted.row_mut(row).scale_mut(w);
    }
    let g = jacobian.transpose() * weighted;

    if g.iter().any(|value| !value.is_finite()) {
        return Err(ReflError::Information(
            ErrorInfo::new("fisher-non-finite", "Fisher information contains non-finite entries")
                .with_context("parameters", params.names(indices).join(", "))
                .with_hint("check that the model reflectivity is positive at every point"),
        ));
    }
    Ok(g)
}
