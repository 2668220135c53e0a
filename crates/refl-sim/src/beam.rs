//! Instrument direct beam spectra and the binning of a measurement angle into Q.

use std::path::Path;

use refl_core::errors::{ErrorInfo, ReflError};
use serde::{Deserialize, Serialize};

use std::f64::consts::PI;

/// Angle (degrees) at which a direct beam spectrum was recorded.
pub const DEFAULT_ANGLE_SCALE: f64 = 0.3;

/// Peak flux of the built-in spectrum, in neutrons per second per wavelength bin.
const BUILTIN_PEAK_FLUX: f64 = 8.0e3;

/// Incident flux as a function of wavelength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectBeam {
    /// Name of the instrument or beam file.
    pub name: String,
    /// Wavelengths in Å.
    pub wavelengths: Vec<f64>,
    /// Flux per wavelength bin, in neutrons per second at [`DirectBeam::angle_scale`].
    pub flux: Vec<f64>,
    /// Angle at which the flux was recorded.
    #[serde(default = "default_angle_scale")]
    pub angle_scale: f64,
}

fn default_angle_scale() -> f64 {
    DEFAULT_ANGLE_SCALE
}

/// Binned Q values and incident flux for one measurement angle.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementGrid {
    /// Q bin centres in Å⁻¹.
    pub q: Vec<f64>,
    /// Incident neutrons per unit time in each bin.
    pub flux: Vec<f64>,
}

impl DirectBeam {
    /// Beam from matching wavelength and flux columns.
    pub fn new(
        name: impl Into<String>,
        wavelengths: Vec<f64>,
        flux: Vec<f64>,
    ) -> Result<Self, ReflError> {
        let beam = Self {
            name: name.into(),
            wavelengths,
            flux,
            angle_scale: DEFAULT_ANGLE_SCALE,
        };
        beam.validate()?;
        Ok(beam)
    }

    /// Built-in spectrum shaped like a pulsed-source reflectometer (OFFSPEC-like).
    ///
    /// A Maxwellian in wavelength peaking near 2.5 Å, sampled from 1 to 14 Å.
    pub fn offspec() -> Self {
        let temperature = 4.0;
        let wavelengths: Vec<f64> = (0..=260).map(|i| 1.0 + 0.05 * i as f64).collect();
        let raw: Vec<f64> = wavelengths
            .iter()
            .map(|&lambda| {
                let x = temperature / lambda;
                x.powi(5) * (-x * x).exp()
            })
            .collect();
        let peak = raw.iter().cloned().fold(f64::MIN, f64::max);
        Self {
            name: "OFFSPEC".to_string(),
            wavelengths,
            flux: raw.iter().map(|f| f / peak * BUILTIN_PEAK_FLUX).collect(),
            angle_scale: DEFAULT_ANGLE_SCALE,
        }
    }

    /// Loads a two-column `wavelength, flux` comma separated file.
    ///
    /// Lines starting with `#` are ignored. Extra columns are allowed.
    pub fn from_csv(path: &Path) -> Result<Self, ReflError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|err| beam_read_error(path, err))?;
        let mut wavelengths = Vec::new();
        let mut flux = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|err| beam_read_error(path, err))?;
            let parse = |idx: usize| -> Result<f64, ReflError> {
                record
                    .get(idx)
                    .and_then(|field| field.parse::<f64>().ok())
                    .ok_or_else(|| {
                        ReflError::Simulation(
                            ErrorInfo::new("beam-parse", "expected numeric wavelength and flux")
                                .with_context("path", path.display().to_string())
                                .with_context("line", (line + 1).to_string()),
                        )
                    })
            };
            wavelengths.push(parse(0)?);
            flux.push(parse(1)?);
        }
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("direct_beam")
            .to_string();
        Self::new(name, wavelengths, flux)
    }

    fn validate(&self) -> Result<(), ReflError> {
        if self.wavelengths.is_empty() || self.wavelengths.len() != self.flux.len() {
            return Err(ReflError::Simulation(
                ErrorInfo::new("beam-shape", "wavelength and flux columns must be non-empty and equal in length")
                    .with_context("wavelengths", self.wavelengths.len().to_string())
                    .with_context("flux", self.flux.len().to_string()),
            ));
        }
        let valid = self
            .wavelengths
            .iter()
            .zip(&self.flux)
            .all(|(&lambda, &flux)| lambda > 0.0 && lambda.is_finite() && flux >= 0.0 && flux.is_finite());
        if !valid {
            return Err(ReflError::Simulation(ErrorInfo::new(
                "beam-values",
                "wavelengths must be positive and flux non-negative",
            )));
        }
        Ok(())
    }

    /// Bins the spectrum measured at `angle` (degrees) into `points` Q bins.
    ///
    /// Bin edges are geometrically spaced between the smallest and largest Q,
    /// each bin collects the flux of the wavelengths falling into it (last bin
    /// closed) and its Q is the midpoint of its edges.
    pub fn measurement_grid(&self, angle: f64, points: usize) -> Result<MeasurementGrid, ReflError> {
        if !(angle > 0.0 && angle < 90.0) || points == 0 {
            return Err(ReflError::Simulation(
                ErrorInfo::new("angle-invalid", "angle must lie in (0, 90) degrees with at least one point")
                    .with_context("angle", angle.to_string())
                    .with_context("points", points.to_string()),
            ));
        }
        let flux_scale = (angle / self.angle_scale).powi(2);
        let sin = angle.to_radians().sin();
        let q: Vec<f64> = self.wavelengths.iter().map(|&l| 4.0 * PI * sin / l).collect();
        let q_min = q.iter().cloned().fold(f64::INFINITY, f64::min);
        let q_max = q.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if q_max <= q_min {
            return Err(ReflError::Simulation(
                ErrorInfo::new("beam-degenerate", "direct beam spans a single wavelength")
                    .with_context("beam", self.name.clone()),
            ));
        }

        let edges = geomspace(q_min, q_max, points + 1);
        let mut binned = vec![0.0; points];
        for (&qi, &flux) in q.iter().zip(&self.flux) {
            let upper = edges.partition_point(|&edge| edge <= qi);
            let bin = upper.saturating_sub(1).min(points - 1);
            binned[bin] += flux * flux_scale;
        }
        let centres = edges.windows(2).map(|pair| 0.5 * (pair[0] + pair[1])).collect();
        Ok(MeasurementGrid {
            q: centres,
            flux: binned,
        })
    }
}

impl Default for DirectBeam {
    fn default() -> Self {
        Self::offspec()
    }
}

/// `n` geometrically spaced values from `start` to `stop`, both exact.
pub fn geomspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (log_start, log_stop) = (start.ln(), stop.ln());
            let mut values: Vec<f64> = (0..n)
                .map(|i| (log_start + (log_stop - log_start) * i as f64 / (n - 1) as f64).exp())
                .collect();
            values[0] = start;
            values[n - 1] = stop;
            values
        }
    }
}

fn beam_read_error(path: &Path, err: csv::Error) -> ReflError {
    ReflError::Io(
        ErrorInfo::new("beam-read", err.to_string()).with_context("path", path.display().to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn binning_conserves_flux() {
        let beam = DirectBeam::offspec();
        let grid = beam.measurement_grid(0.7, 50).unwrap();
        let total: f64 = beam.flux.iter().sum::<f64>() * (0.7f64 / 0.3).powi(2);
        assert_relative_eq!(grid.flux.iter().sum::<f64>(), total, max_relative = 1e-12);
        assert_eq!(grid.q.len(), 50);
        assert!(grid.q.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn geomspace_endpoints_are_exact() {
        let values = geomspace(0.005, 0.3, 7);
        assert_eq!(values[0], 0.005);
        assert_eq!(values[6], 0.3);
        assert_relative_eq!(values[1] / values[0], values[2] / values[1], max_relative = 1e-12);
    }

    #[test]
    fn rejects_bad_angles() {
        let beam = DirectBeam::offspec();
        assert!(beam.measurement_grid(0.0, 10).is_err());
        assert!(beam.measurement_grid(0.7, 0).is_err());
    }
}
