//! Figures of a sample's SLD profile and model reflectivity.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use refl_core::errors::ReflError;
use refl_model::{sld_profile, Sample, SpinState, Structure};
use refl_sim::beam::geomspace;
use refl_sim::{reflectivity, Conditions, ReflectModel};

use crate::figure::{extent, log_extent, plot_error, save_plot, PALETTE};

/// Depth samples in an SLD profile figure.
const PROFILE_POINTS: usize = 500;

/// Q range and instrument settings of a model reflectivity figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileOptions {
    /// Smallest Q in Å⁻¹.
    pub q_min: f64,
    /// Largest Q in Å⁻¹.
    pub q_max: f64,
    /// Number of Q values.
    pub points: usize,
    /// Experimental scale factor.
    pub scale: f64,
    /// Constant background.
    pub bkg: f64,
    /// Resolution, dQ/Q as a FWHM percentage.
    pub dq: f64,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            q_min: 0.005,
            q_max: 0.4,
            points: 500,
            scale: 1.0,
            bkg: 1e-7,
            dq: 2.0,
        }
    }
}

impl ProfileOptions {
    /// Q values of the figure, spaced geometrically from `q_min` to `q_max`.
    pub fn q(&self) -> Vec<f64> {
        geomspace(self.q_min, self.q_max, self.points.max(2))
    }
}

fn channels(structure: &Structure) -> Vec<SpinState> {
    if structure.is_magnetic() {
        vec![SpinState::UpUp, SpinState::DownDown]
    } else {
        vec![SpinState::Unpolarised]
    }
}

/// Plots the SLD profile of `sample` to `<save_path>/<sample name>/sld_profile.svg`.
///
/// Magnetic samples get one curve per non spin-flip channel.
pub fn plot_sld_profile(sample: &dyn Sample, save_path: &Path) -> Result<PathBuf, ReflError> {
    let structure = sample.structure()?;
    let mut curves = Vec::new();
    for spin in channels(&structure) {
        let (z, sld) = sld_profile(&structure, spin, PROFILE_POINTS)?;
        curves.push((spin, z, sld));
    }
    let (z_lo, z_hi) = extent(curves.iter().flat_map(|c| c.1.iter()));
    let (s_lo, s_hi) = extent(curves.iter().flat_map(|c| c.2.iter()));
    let pad = 0.05 * (s_hi - s_lo);

    save_plot(&save_path.join(sample.name()), "sld_profile", |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(sample.name(), ("sans-serif", 28).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(z_lo..z_hi, (s_lo - pad)..(s_hi + pad))
            .map_err(plot_error)?;
        chart
            .configure_mesh()
            .x_desc("Distance (Å)")
            .y_desc("SLD (10⁻⁶ Å⁻²)")
            .draw()
            .map_err(plot_error)?;
        for (idx, (spin, z, sld)) in curves.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            chart
                .draw_series(LineSeries::new(
                    z.iter().copied().zip(sld.iter().copied()),
                    color.stroke_width(2),
                ))
                .map_err(plot_error)?
                .label(spin.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        if curves.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(plot_error)?;
        }
        Ok(())
    })
}

/// Plots the model reflectivity of `sample` to `<save_path>/<sample name>/reflectivity_profile.svg`.
pub fn plot_reflectivity_profile(
    sample: &dyn Sample,
    save_path: &Path,
    options: &ProfileOptions,
) -> Result<PathBuf, ReflError> {
    let structure = sample.structure()?;
    let q = options.q();
    let conditions = Conditions::new(options.scale, options.bkg, options.dq);
    let mut curves = Vec::new();
    for spin in channels(&structure) {
        let model = ReflectModel::new(structure.clone(), conditions).with_spin(spin);
        curves.push((spin, reflectivity(&q, &model)?));
    }
    let (r_lo, r_hi) = log_extent(curves.iter().flat_map(|c| c.1.iter()));

    save_plot(&save_path.join(sample.name()), "reflectivity_profile", |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(sample.name(), ("sans-serif", 28).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(options.q_min..options.q_max, (r_lo..r_hi).log_scale())
            .map_err(plot_error)?;
        chart
            .configure_mesh()
            .x_desc("Q (Å⁻¹)")
            .y_desc("Reflectivity (arb.)")
            .y_label_formatter(&|y| format!("{y:.0e}"))
            .draw()
            .map_err(plot_error)?;
        for (idx, (spin, r)) in curves.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            chart
                .draw_series(LineSeries::new(
                    q.iter().copied().zip(r.iter().copied()),
                    color.stroke_width(2),
                ))
                .map_err(plot_error)?
                .label(spin.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
        if curves.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(plot_error)?;
        }
        Ok(())
    })
}
