#![deny(missing_docs)]
//! Layered sample structures for neutron reflectometry experimental design.
//!
//! Structures are listed ambient (fronting) medium first and can be built with
//! the `|` stacking operator:
//!
//! ```
//! use refl_model::Layer;
//!
//! let structure = Layer::new("Air", 0.0)
//!     | Layer::new("Layer 1", 4.0).slab(100.0, 2.0)
//!     | Layer::new("Substrate", 2.047).with_rough(2.0);
//! assert_eq!(structure.len(), 3);
//! ```
//!
//! Samples wrap a structure together with the parameters it is built from.
//! Information calculations rebuild the structure from perturbed copies of
//! those parameters.

pub mod bilayer;
pub mod layer;
pub mod library;
pub mod magnetic;
pub mod profile;
pub mod sample;
pub mod structure;

pub use bilayer::{BilayerDmpc, D2O_SLD, H2O_SLD};
pub use layer::{Layer, Magnetism};
pub use library::{standard_sample, STANDARD_SAMPLES};
pub use magnetic::SampleYig;
pub use profile::sld_profile;
pub use sample::{Conditions, ContrastSample, LayeredSample, Sample, Underlayer};
pub use structure::{Slab, SpinState, StackOrder, Structure};
