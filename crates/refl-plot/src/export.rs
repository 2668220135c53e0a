//! CSV export of simulated data and study results.

use std::fs;
use std::path::Path;

use refl_core::errors::{ErrorInfo, ReflError};
use refl_exp::{Grid2D, Series};
use refl_sim::SimulatedData;
use tracing::info;

fn csv_error(path: &Path, err: impl ToString) -> ReflError {
    ReflError::Io(
        ErrorInfo::new("csv-write", err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn writer(path: &Path) -> Result<csv::Writer<fs::File>, ReflError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| ReflError::io("csv-dir", parent, err))?;
    }
    csv::Writer::from_path(path).map_err(|err| csv_error(path, err))
}

/// Writes `grid` in long format, one `x, y, value` row per grid point.
pub fn write_grid_csv(grid: &Grid2D, path: &Path) -> Result<(), ReflError> {
    let mut wtr = writer(path)?;
    wtr.write_record([&grid.x_label, &grid.y_label, &grid.z_label])
        .map_err(|err| csv_error(path, err))?;
    for (x, row) in grid.x.iter().zip(&grid.values) {
        for (y, value) in grid.y.iter().zip(row) {
            wtr.write_record([x.to_string(), y.to_string(), value.to_string()])
                .map_err(|err| csv_error(path, err))?;
        }
    }
    wtr.flush().map_err(|err| csv_error(path, err))?;
    info!(path = %path.display(), points = grid.len(), "wrote grid");
    Ok(())
}

/// Writes `x, value` rows with the series labels as header.
pub fn write_series_csv(series: &Series, path: &Path) -> Result<(), ReflError> {
    let mut wtr = writer(path)?;
    wtr.write_record([&series.x_label, &series.y_label])
        .map_err(|err| csv_error(path, err))?;
    for (x, value) in series.x.iter().zip(&series.values) {
        wtr.write_record([x.to_string(), value.to_string()])
            .map_err(|err| csv_error(path, err))?;
    }
    wtr.flush().map_err(|err| csv_error(path, err))?;
    Ok(())
}

/// Writes simulated data as `q, r, dr, counts` columns.
pub fn write_data_csv(data: &SimulatedData, path: &Path) -> Result<(), ReflError> {
    let mut wtr = writer(path)?;
    wtr.write_record(["q", "r", "dr", "counts"])
        .map_err(|err| csv_error(path, err))?;
    for row in data.rows() {
        wtr.write_record([
            row.q.to_string(),
            row.r.to_string(),
            row.dr.to_string(),
            row.counts.to_string(),
        ])
        .map_err(|err| csv_error(path, err))?;
    }
    wtr.flush().map_err(|err| csv_error(path, err))?;
    Ok(())
}
