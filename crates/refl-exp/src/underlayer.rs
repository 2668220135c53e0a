//! Choice of underlayers beneath a sample.

use refl_core::errors::ReflError;
use refl_info::{min_eigenvalue, underlayer_info, MagneticUnderlayerInfo};
use refl_model::{ContrastSample, SampleYig, Underlayer};
use refl_sim::{AngleTime, DirectBeam};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::sweep::{grid_2d, Grid2D, GridPoint, Scheduler};

/// Information on the Pt magnetic SLD over a grid of YIG and Pt thicknesses.
///
/// `values[i][j]` is the information for `yig_thicks[i]` and `pt_thicks[j]`.
pub fn magnetic_underlayer_sweep(
    yig: &SampleYig,
    yig_thicks: &[f64],
    pt_thicks: &[f64],
    angle_times: &[AngleTime],
    beam: &DirectBeam,
    scheduler: &Scheduler,
) -> Result<Grid2D, ReflError> {
    grid_2d(
        scheduler,
        ("YIG Thickness (Å)", "Pt Thickness (Å)", "Fisher Information"),
        yig_thicks,
        pt_thicks,
        |yig_thick, pt_thick| {
            let g = yig.underlayer_info(angle_times, yig_thick, pt_thick, beam)?;
            Ok(g[(0, 0)])
        },
    )
}

/// Outcome of an underlayer thickness and SLD scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderlayerChoice {
    /// Minimum eigenvalue over thickness and SLD.
    pub grid: Grid2D,
    /// Largest finite grid value.
    pub best: Option<GridPoint>,
}

/// Minimum eigenvalue of the information for each single `(thickness, sld)` underlayer.
pub fn underlayer_choice<S: ContrastSample + ?Sized>(
    sample: &S,
    thicknesses: &[f64],
    slds: &[f64],
    contrasts: &[f64],
    angle_times: &[AngleTime],
    beam: &DirectBeam,
    scheduler: &Scheduler,
) -> Result<UnderlayerChoice, ReflError> {
    let grid = grid_2d(
        scheduler,
        (
            "Underlayer Thickness (Å)",
            "Underlayer SLD (10⁻⁶ Å⁻²)",
            "Minimum Eigenvalue",
        ),
        thicknesses,
        slds,
        |thick, sld| {
            let underlayers = [Underlayer { thick, sld }];
            let g = underlayer_info(sample, angle_times, contrasts, &underlayers, beam)?;
            Ok(min_eigenvalue(&g))
        },
    )?;
    let best = grid.argmax();
    if let Some(point) = best {
        info!(
            sample = sample.name(),
            thickness = point.x,
            sld = point.y,
            "best underlayer"
        );
    }
    Ok(UnderlayerChoice { grid, best })
}
