#![deny(missing_docs)]
//! Experimental design studies for neutron reflectometry.
//!
//! Studies compare candidate measurements by the Fisher information they
//! carry: grids over underlayer and layer thicknesses, the choice of angles,
//! contrasts and counting times, kinetic experiments and log-likelihood
//! ratios of simulated data. Grids run on a [`Scheduler`] and continuous
//! choices are optimised with [`differential_evolution`]. A [`DesignPlan`]
//! batches studies into a reproducible [`DesignReport`].

mod angles;
mod kinetics;
mod log_ratio;
mod optimise;
mod plan;
mod report;
mod serde;
mod sweep;
mod target;
mod underlayer;

pub use angles::{angle_choice, AngleChoice};
pub use kinetics::{kinetic_information, kinetics};
pub use log_ratio::{calc_log_ratios, LogRatios};
pub use optimise::{
    differential_evolution, optimise_angle_times, optimise_kinetics, optimise_underlayers,
    optimise_yig_thickness, DifferentialEvolutionOptions, OptimisationResult,
    OptimisedAngleTimes, OptimisedKinetics, OptimisedThicknesses, OptimisedUnderlayers,
};
pub use plan::{load_plan, run_plan, run_plan_from_path, DesignPlan, Study, StudyOutcome};
pub use report::{load_report, write_report, DesignReport, StudyReport, REPORT_FILE};
pub use crate::serde::{
    from_json_slice, from_yaml_slice, stable_hash_string, to_canonical_json_bytes, to_yaml_string,
};
pub use sweep::{arange, grid_2d, linspace, series, Grid2D, GridPoint, Scheduler, Series, Values};
pub use target::{DesignTarget, LibrarySample};
pub use underlayer::{magnetic_underlayer_sweep, underlayer_choice, UnderlayerChoice};
