//! Simulation of counting experiments from a measurement plan.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use refl_core::errors::{ErrorInfo, ReflError};
use refl_model::{Conditions, SpinState, Structure};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::beam::DirectBeam;
use crate::model::{reflectivity, ReflectModel};

/// Measurement of `points` Q bins at `angle` degrees for `time` (arbitrary units, normally seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleTime {
    /// Angle of incidence in degrees.
    pub angle: f64,
    /// Number of Q bins.
    pub points: usize,
    /// Counting time.
    pub time: f64,
}

impl AngleTime {
    /// Measurement of `points` bins at `angle` for `time`.
    pub fn new(angle: f64, points: usize, time: f64) -> Self {
        Self {
            angle,
            points,
            time,
        }
    }
}

impl From<(f64, usize, f64)> for AngleTime {
    fn from((angle, points, time): (f64, usize, f64)) -> Self {
        Self::new(angle, points, time)
    }
}

/// One simulated data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Bin centre in Å⁻¹.
    pub q: f64,
    /// Measured reflectivity.
    pub r: f64,
    /// Counting uncertainty of `r`.
    pub dr: f64,
    /// Incident neutron count in the bin.
    pub counts: f64,
}

/// Simulated reflectivity data sorted by ascending Q.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatedData {
    rows: Vec<DataPoint>,
}

impl SimulatedData {
    /// Builds a dataset, dropping rows with any zero entry and sorting by Q.
    pub fn from_rows(mut rows: Vec<DataPoint>) -> Self {
        rows.retain(|row| row.q != 0.0 && row.r != 0.0 && row.dr != 0.0 && row.counts != 0.0);
        rows.sort_by(|a, b| a.q.total_cmp(&b.q));
        Self { rows }
    }

    /// Rows sorted by ascending Q.
    pub fn rows(&self) -> &[DataPoint] {
        &self.rows
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no points.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Q column.
    pub fn q(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.q).collect()
    }

    /// Reflectivity column.
    pub fn r(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.r).collect()
    }

    /// Uncertainty column.
    pub fn dr(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.dr).collect()
    }

    /// Incident count column.
    pub fn counts(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.counts).collect()
    }
}

/// Which polarised channels to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinChannels {
    /// `++` channel.
    #[serde(default)]
    pub pp: bool,
    /// `+-` channel.
    #[serde(default)]
    pub pm: bool,
    /// `-+` channel.
    #[serde(default)]
    pub mp: bool,
    /// `--` channel.
    #[serde(default)]
    pub mm: bool,
}

impl SpinChannels {
    /// The two non spin-flip channels.
    pub const fn non_spin_flip() -> Self {
        Self {
            pp: true,
            pm: false,
            mp: false,
            mm: true,
        }
    }

    /// All four channels.
    pub const fn all() -> Self {
        Self {
            pp: true,
            pm: true,
            mp: true,
            mm: true,
        }
    }

    /// Requested states in `pp, pm, mp, mm` order.
    pub fn states(&self) -> Vec<SpinState> {
        [
            (self.pp, SpinState::UpUp),
            (self.pm, SpinState::UpDown),
            (self.mp, SpinState::DownUp),
            (self.mm, SpinState::DownDown),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, state)| state)
        .collect()
    }
}

impl Default for SpinChannels {
    fn default() -> Self {
        Self::non_spin_flip()
    }
}

fn validate_plan(angle_times: &[AngleTime]) -> Result<(), ReflError> {
    if angle_times.is_empty() {
        return Err(ReflError::Simulation(ErrorInfo::new(
            "plan-empty",
            "a measurement plan needs at least one angle",
        )));
    }
    for at in angle_times {
        if !(at.time > 0.0 && at.time.is_finite()) || at.points == 0 {
            return Err(ReflError::Simulation(
                ErrorInfo::new("plan-invalid", "counting times must be positive with at least one point")
                    .with_context("angle", at.angle.to_string())
                    .with_context("points", at.points.to_string())
                    .with_context("time", at.time.to_string()),
            ));
        }
    }
    Ok(())
}

/// Noise-free Q values and incident counts of a measurement plan.
///
/// Bins receiving no flux are dropped and the result is sorted by Q.
pub fn measurement_points(
    angle_times: &[AngleTime],
    beam: &DirectBeam,
) -> Result<(Vec<f64>, Vec<f64>), ReflError> {
    validate_plan(angle_times)?;
    let mut points = Vec::new();
    for at in angle_times {
        let grid = beam.measurement_grid(at.angle, at.points)?;
        points.extend(
            grid.q
                .into_iter()
                .zip(grid.flux)
                .map(|(q, flux)| (q, flux * at.time))
                .filter(|&(_, counts)| counts > 0.0),
        );
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(points.into_iter().unzip())
}

fn run_experiment<R: Rng + ?Sized>(
    model: &ReflectModel,
    at: &AngleTime,
    beam: &DirectBeam,
    rng: &mut R,
) -> Result<Vec<DataPoint>, ReflError> {
    let grid = beam.measurement_grid(at.angle, at.points)?;
    let r_model = reflectivity(&grid.q, model)?;
    let mut rows = Vec::with_capacity(grid.q.len());
    for ((&q, &flux), &r) in grid.q.iter().zip(&grid.flux).zip(&r_model) {
        let incident = flux * at.time;
        let expected = r * incident;
        let reflected = if expected > 0.0 {
            Poisson::new(expected)
                .map_err(|err| {
                    ReflError::Simulation(
                        ErrorInfo::new("poisson", err.to_string())
                            .with_context("q", q.to_string())
                            .with_context("mean", expected.to_string()),
                    )
                })?
                .sample(rng)
        } else {
            0.0
        };
        let (r_noisy, r_error) = if incident != 0.0 {
            (reflected / incident, reflected.sqrt() / incident)
        } else {
            (0.0, 0.0)
        };
        rows.push(DataPoint {
            q,
            r: r_noisy,
            dr: r_error,
            counts: incident,
        });
    }
    Ok(rows)
}

/// Simulates an unpolarised measurement of `structure` following `angle_times`.
pub fn simulate<R: Rng + ?Sized>(
    structure: &Structure,
    angle_times: &[AngleTime],
    conditions: Conditions,
    beam: &DirectBeam,
    rng: &mut R,
) -> Result<(ReflectModel, SimulatedData), ReflError> {
    validate_plan(angle_times)?;
    let model = ReflectModel::new(structure.clone(), conditions);
    let mut rows = Vec::new();
    for at in angle_times {
        rows.extend(run_experiment(&model, at, beam, rng)?);
    }
    let data = SimulatedData::from_rows(rows);
    debug!(
        structure = %structure.name,
        angles = angle_times.len(),
        points = data.len(),
        "simulated measurement"
    );
    Ok((model, data))
}

/// Simulates a polarised measurement, one model and dataset per requested channel.
pub fn simulate_magnetic<R: Rng + ?Sized>(
    structure: &Structure,
    angle_times: &[AngleTime],
    conditions: Conditions,
    beam: &DirectBeam,
    channels: SpinChannels,
    rng: &mut R,
) -> Result<(Vec<ReflectModel>, Vec<SimulatedData>), ReflError> {
    validate_plan(angle_times)?;
    let states = channels.states();
    if states.is_empty() {
        return Err(ReflError::Simulation(ErrorInfo::new(
            "channels-empty",
            "at least one spin channel must be requested",
        )));
    }
    let mut models = Vec::with_capacity(states.len());
    let mut datasets = Vec::with_capacity(states.len());
    for spin in states {
        let model = ReflectModel::new(structure.clone(), conditions).with_spin(spin);
        let mut rows = Vec::new();
        for at in angle_times {
            rows.extend(run_experiment(&model, at, beam, rng)?);
        }
        datasets.push(SimulatedData::from_rows(rows));
        models.push(model);
    }
    Ok((models, datasets))
}
