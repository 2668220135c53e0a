//! Figures of simulated measurements.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use refl_core::errors::{ErrorInfo, ReflError};
use refl_sim::{ReflectModel, SimulatedData};

use crate::figure::{extent, log_extent, plot_error, save_plot, PALETTE};

/// Plots simulated `q, r, dr` data with the reflectivity of its model on a log axis.
///
/// `models[i]` is drawn over `datasets[i]`; the figure is `<save_path>/<name>.svg`.
pub fn plot_reflectivity(
    models: &[ReflectModel],
    datasets: &[SimulatedData],
    save_path: &Path,
    name: &str,
) -> Result<PathBuf, ReflError> {
    if models.len() != datasets.len() || datasets.is_empty() {
        return Err(ReflError::Io(
            ErrorInfo::new("plot-shape", "one model is needed per dataset")
                .with_context("models", models.len().to_string())
                .with_context("datasets", datasets.len().to_string()),
        ));
    }
    let mut curves = Vec::with_capacity(models.len());
    for (model, data) in models.iter().zip(datasets) {
        let q = data.q();
        curves.push(model.reflectivity(&q)?);
    }
    let (q_lo, q_hi) = extent(datasets.iter().flat_map(|d| d.rows().iter().map(|row| &row.q)));
    let (r_lo, r_hi) = log_extent(
        datasets
            .iter()
            .flat_map(|d| d.rows().iter().map(|row| &row.r))
            .chain(curves.iter().flatten()),
    );

    save_plot(save_path, name, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(name, ("sans-serif", 28).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(q_lo..q_hi, (r_lo..r_hi).log_scale())
            .map_err(plot_error)?;
        chart
            .configure_mesh()
            .x_desc("Q (Å⁻¹)")
            .y_desc("Reflectivity (arb.)")
            .y_label_formatter(&|y| format!("{y:.0e}"))
            .draw()
            .map_err(plot_error)?;
        for (idx, ((model, data), r_model)) in models.iter().zip(datasets).zip(&curves).enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            chart
                .draw_series(data.rows().iter().filter(|row| row.r > 0.0).map(|row| {
                    ErrorBar::new_vertical(
                        row.q,
                        (row.r - row.dr).max(r_lo),
                        row.r,
                        row.r + row.dr,
                        color.filled(),
                        4,
                    )
                }))
                .map_err(plot_error)?
                .label(model.spin.label())
                .legend(move |(x, y)| Circle::new((x + 10, y), 3, color.filled()));
            chart
                .draw_series(LineSeries::new(
                    data.q().into_iter().zip(r_model.iter().copied()),
                    BLACK.stroke_width(1),
                ))
                .map_err(plot_error)?;
        }
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_error)?;
        Ok(())
    })
}
