#![deny(missing_docs)]
#![doc = "Core types shared by the reflectometry experimental design crates: errors, parameters, seeding and provenance."]

pub mod errors;
pub mod params;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, ReflError};
pub use params::{Parameter, ParameterSet};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
