//! Choice of the next measurement angle.

use refl_core::errors::ReflError;
use refl_info::min_eigenvalue;
use refl_sim::{AngleTime, DirectBeam};
use serde::{Deserialize, Serialize};

use crate::sweep::{series, Scheduler, Series};
use crate::target::DesignTarget;

/// Information obtained for each candidate angle appended to a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleChoice {
    /// Minimum eigenvalue for each candidate angle.
    pub series: Series,
    /// Angle with the largest minimum eigenvalue.
    pub best: Option<f64>,
}

/// Minimum eigenvalue after adding `(angle, points, time)` to `initial` for every candidate angle.
#[allow(clippy::too_many_arguments)]
pub fn angle_choice(
    target: DesignTarget<'_>,
    initial: &[AngleTime],
    angles: &[f64],
    points: usize,
    time: f64,
    beam: &DirectBeam,
    scheduler: &Scheduler,
) -> Result<AngleChoice, ReflError> {
    let series = series(
        scheduler,
        ("Angle (°)", "Minimum Eigenvalue"),
        angles,
        |angle| {
            let mut plan = initial.to_vec();
            plan.push(AngleTime::new(angle, points, time));
            Ok(min_eigenvalue(&target.information(&plan, beam)?))
        },
    )?;
    let best = series.argmax().map(|(angle, _)| angle);
    Ok(AngleChoice { series, best })
}
