//! Figures of design study results.

use std::path::{Path, PathBuf};

use plotters::prelude::*;
use refl_core::errors::ReflError;
use refl_exp::{Grid2D, Series};

use crate::figure::{extent, plot_error, save_plot, PALETTE};

/// Line plot of a one dimensional study.
pub fn plot_series(series: &Series, save_path: &Path, name: &str) -> Result<PathBuf, ReflError> {
    let (x_lo, x_hi) = extent(&series.x);
    let (y_lo, y_hi) = extent(&series.values);
    let pad = 0.05 * (y_hi - y_lo);
    save_plot(save_path, name, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(x_lo..x_hi, (y_lo - pad)..(y_hi + pad))
            .map_err(plot_error)?;
        chart
            .configure_mesh()
            .x_desc(series.x_label.as_str())
            .y_desc(series.y_label.as_str())
            .y_label_formatter(&|y| format!("{y:.2e}"))
            .draw()
            .map_err(plot_error)?;
        let points = || {
            series
                .x
                .iter()
                .copied()
                .zip(series.values.iter().copied())
                .filter(|(_, v)| v.is_finite())
        };
        chart
            .draw_series(LineSeries::new(points(), PALETTE[0].stroke_width(2)))
            .map_err(plot_error)?;
        chart
            .draw_series(points().map(|p| Circle::new(p, 3, PALETTE[0].filled())))
            .map_err(plot_error)?;
        Ok(())
    })
}

/// Cell boundaries around grid values, halfway between neighbours.
fn cell_edges(values: &[f64]) -> Vec<f64> {
    match values.len() {
        0 => Vec::new(),
        1 => vec![values[0] - 0.5, values[0] + 0.5],
        n => {
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(values[0] - 0.5 * (values[1] - values[0]));
            edges.extend(values.windows(2).map(|pair| 0.5 * (pair[0] + pair[1])));
            edges.push(values[n - 1] + 0.5 * (values[n - 1] - values[n - 2]));
            edges
        }
    }
}

/// Blue (low) to red (high) colour for `t` in `[0, 1]`.
fn heat_color(t: f64) -> HSLColor {
    HSLColor(0.66 * (1.0 - t.clamp(0.0, 1.0)), 0.85, 0.5)
}

/// Heatmap of a two dimensional study with the best point marked.
pub fn plot_heatmap(grid: &Grid2D, save_path: &Path, name: &str) -> Result<PathBuf, ReflError> {
    let x_edges = cell_edges(&grid.x);
    let y_edges = cell_edges(&grid.y);
    let (x_lo, x_hi) = extent(&x_edges);
    let (y_lo, y_hi) = extent(&y_edges);
    let (z_lo, z_hi) = extent(grid.values.iter().flatten());
    let best = grid.argmax();

    save_plot(save_path, name, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(grid.z_label.as_str(), ("sans-serif", 24).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(plot_error)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(grid.x_label.as_str())
            .y_desc(grid.y_label.as_str())
            .draw()
            .map_err(plot_error)?;
        let cells = grid.values.iter().enumerate().flat_map(|(i, row)| {
            let (x_edges, y_edges) = (&x_edges, &y_edges);
            row.iter().enumerate().map(move |(j, &value)| {
                let t = if value.is_finite() {
                    (value - z_lo) / (z_hi - z_lo)
                } else {
                    0.0
                };
                Rectangle::new(
                    [(x_edges[i], y_edges[j]), (x_edges[i + 1], y_edges[j + 1])],
                    heat_color(t).filled(),
                )
            })
        });
        chart.draw_series(cells).map_err(plot_error)?;
        if let Some(point) = best {
            chart
                .draw_series(std::iter::once(Cross::new(
                    (point.x, point.y),
                    6,
                    BLACK.stroke_width(2),
                )))
                .map_err(plot_error)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_bracket_values() {
        assert_eq!(cell_edges(&[1.0, 2.0, 4.0]), vec![0.5, 1.5, 3.0, 5.0]);
        assert_eq!(cell_edges(&[3.0]), vec![2.5, 3.5]);
        assert!(cell_edges(&[]).is_empty());
    }
}
