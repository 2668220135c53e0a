use std::fmt;

use nalgebra::DMatrix;
use refl_core::errors::{ErrorInfo, ReflError};
use refl_info::{angle_info, contrast_info};
use refl_model::{
    standard_sample, BilayerDmpc, ContrastSample, LayeredSample, Sample, SampleYig, Underlayer,
    STANDARD_SAMPLES,
};
use refl_sim::{AngleTime, DirectBeam};

const YIG_NAME: &str = "YIG_sample";
const BILAYER_NAME: &str = "DMPC_bilayer";

/// A sample together with the way it is measured.
#[derive(Clone, Copy)]
pub enum DesignTarget<'a> {
    /// One measurement in the sample's usual conditions.
    Single(&'a dyn Sample),
    /// One measurement per contrast, optionally on top of underlayers.
    Contrasts {
        /// Sample measured.
        sample: &'a dyn ContrastSample,
        /// Bulk water SLDs, one measurement each.
        contrasts: &'a [f64],
        /// Underlayers beneath the sample.
        underlayers: &'a [Underlayer],
    },
}

impl fmt::Debug for DesignTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignTarget::Single(_) => f.debug_tuple("Single").field(&self.name()).finish(),
            DesignTarget::Contrasts {
                contrasts,
                underlayers,
                ..
            } => f
                .debug_struct("Contrasts")
                .field("sample", &self.name())
                .field("contrasts", contrasts)
                .field("underlayers", underlayers)
                .finish(),
        }
    }
}

impl<'a> DesignTarget<'a> {
    /// Name of the underlying sample.
    pub fn name(&self) -> &str {
        match self {
            DesignTarget::Single(sample) => sample.name(),
            DesignTarget::Contrasts { sample, .. } => sample.name(),
        }
    }

    /// Fisher information of `angle_times` on the varying parameters.
    pub fn information(
        &self,
        angle_times: &[AngleTime],
        beam: &DirectBeam,
    ) -> Result<DMatrix<f64>, ReflError> {
        match *self {
            DesignTarget::Single(sample) => {
                angle_info(sample, angle_times, sample.conditions(), beam)
            }
            DesignTarget::Contrasts {
                sample,
                contrasts,
                underlayers,
            } => contrast_info(
                sample,
                angle_times,
                contrasts,
                underlayers,
                sample.conditions(),
                beam,
            ),
        }
    }
}

/// A sample from the built-in library, resolved by name.
#[derive(Debug, Clone)]
pub enum LibrarySample {
    /// Sample with a fixed structure.
    Layered(LayeredSample),
    /// Magnetic YIG sample.
    Yig(SampleYig),
    /// DMPC bilayer measured in contrasts.
    Bilayer(BilayerDmpc),
}

impl LibrarySample {
    /// Names accepted by [`LibrarySample::load`].
    pub fn names() -> Vec<&'static str> {
        let mut names = STANDARD_SAMPLES.to_vec();
        names.push(YIG_NAME);
        names.push(BILAYER_NAME);
        names
    }

    /// Sample called `name`.
    pub fn load(name: &str) -> Result<Self, ReflError> {
        match name {
            YIG_NAME => Ok(LibrarySample::Yig(SampleYig::new())),
            BILAYER_NAME => Ok(LibrarySample::Bilayer(BilayerDmpc::new())),
            other => standard_sample(other).map(LibrarySample::Layered),
        }
    }

    /// The sample as a [`Sample`].
    pub fn as_sample(&self) -> &dyn Sample {
        match self {
            LibrarySample::Layered(sample) => sample,
            LibrarySample::Yig(sample) => sample,
            LibrarySample::Bilayer(sample) => sample,
        }
    }

    /// Measurement target in `contrasts`, or in the usual conditions when none are given.
    pub fn target<'a>(&'a self, contrasts: &'a [f64]) -> Result<DesignTarget<'a>, ReflError> {
        if contrasts.is_empty() {
            return Ok(DesignTarget::Single(self.as_sample()));
        }
        match self {
            LibrarySample::Bilayer(sample) => Ok(DesignTarget::Contrasts {
                sample,
                contrasts,
                underlayers: &[],
            }),
            other => Err(ReflError::Design(
                ErrorInfo::new("contrasts-unsupported", "sample is not measured in contrasts")
                    .with_context("sample", other.as_sample().name()),
            )),
        }
    }
}
