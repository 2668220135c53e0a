#![deny(missing_docs)]
//! Fisher information for reflectometry experimental design.
//!
//! The information matrix `g = Jᵀ M J` is computed from finite-difference
//! gradients of the model reflectivity at the points a measurement plan
//! would record; its smallest eigenvalue is the usual figure of merit when
//! comparing designs.

pub mod fisher;
pub mod metrics;
pub mod sample_info;

pub use fisher::{fisher, Measurements, DEFAULT_STEP};
pub use metrics::{eigenvalues, min_eigenvalue, FisherSummary};
pub use sample_info::{
    angle_info, contrast_info, contrast_info_for, magnetic_info, underlayer_info,
    MagneticUnderlayerInfo,
};
