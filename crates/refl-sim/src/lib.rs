#![deny(missing_docs)]
//! Specular neutron reflectivity and simulated measurements.
//!
//! [`reflectivity`] evaluates a [`ReflectModel`] on a Q grid, [`simulate`]
//! and [`simulate_magnetic`] turn a measurement plan of
//! `(angle, points, time)` triples into noisy counting data using an
//! instrument [`DirectBeam`], and [`log_likelihood`] scores data against a
//! model.

pub mod beam;
pub mod kernel;
pub mod likelihood;
pub mod model;
pub mod simulate;

pub use beam::{DirectBeam, MeasurementGrid, DEFAULT_ANGLE_SCALE};
pub use likelihood::{joint_log_likelihood, log_likelihood};
pub use model::{reflectivity, ReflectModel};
pub use refl_model::{Conditions, SpinState};
pub use simulate::{
    measurement_points, simulate, simulate_magnetic, AngleTime, DataPoint, SimulatedData,
    SpinChannels,
};
