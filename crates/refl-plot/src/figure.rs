use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use refl_core::errors::{ErrorInfo, ReflError};
use tracing::info;

/// Canvas size of every figure, in pixels.
pub const FIGURE_SIZE: (u32, u32) = (900, 600);

pub(crate) const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

pub(crate) fn plot_error(err: impl Display) -> ReflError {
    ReflError::Io(ErrorInfo::new("plot-draw", err.to_string()))
}

/// Drawing area handed to the closure of [`save_plot`].
pub type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Draws a figure with `draw` and saves it to `<save_path>/<name>.svg`.
///
/// Missing directories are created.
pub fn save_plot<F>(save_path: &Path, name: &str, draw: F) -> Result<PathBuf, ReflError>
where
    F: FnOnce(&Canvas<'_>) -> Result<(), ReflError>,
{
    fs::create_dir_all(save_path).map_err(|err| ReflError::io("plot-dir", save_path, err))?;
    let path = save_path.join(format!("{name}.svg"));
    {
        let root = SVGBackend::new(&path, FIGURE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(plot_error)?;
        draw(&root)?;
        root.present().map_err(plot_error)?;
    }
    info!(path = %path.display(), "saved figure");
    Ok(path)
}

/// `(min, max)` of finite values, widened when degenerate.
pub(crate) fn extent<'a>(values: impl IntoIterator<Item = &'a f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if hi > lo {
        (lo, hi)
    } else {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        (lo - pad, hi + pad)
    }
}

/// `(min, max)` of positive values for a logarithmic axis.
pub(crate) fn log_extent<'a>(values: impl IntoIterator<Item = &'a f64>) -> (f64, f64) {
    let positive: Vec<f64> = values
        .into_iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    let (lo, hi) = extent(positive.iter());
    if positive.is_empty() || lo <= 0.0 {
        return (1e-8, 1.0);
    }
    (lo / 2.0, hi * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extents() {
        assert_eq!(extent(&[1.0, 3.0, f64::NAN]), (1.0, 3.0));
        assert_eq!(extent(&[0.0]), (-1.0, 1.0));
        assert_eq!(extent(&[] as &[f64]), (0.0, 1.0));
        assert_eq!(log_extent(&[0.0, 1e-4, 1.0]), (5e-5, 2.0));
    }
}
