//! The `Sample` trait, instrument conditions and fixed-structure samples.

use refl_core::errors::{ErrorInfo, ReflError};
use refl_core::{Parameter, ParameterSet};
use serde::{Deserialize, Serialize};

use crate::structure::Structure;

/// Instrument conditions a sample is measured under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// Experimental scale factor.
    #[serde(default = "Conditions::default_scale")]
    pub scale: f64,
    /// Constant background level.
    #[serde(default = "Conditions::default_bkg")]
    pub bkg: f64,
    /// Resolution, dQ/Q as a FWHM percentage.
    #[serde(default = "Conditions::default_dq")]
    pub dq: f64,
}

impl Conditions {
    const fn default_scale() -> f64 {
        1.0
    }

    const fn default_bkg() -> f64 {
        5e-6
    }

    const fn default_dq() -> f64 {
        2.0
    }

    /// Conditions with the given scale, background and resolution.
    pub fn new(scale: f64, bkg: f64, dq: f64) -> Self {
        Self { scale, bkg, dq }
    }
}

impl Default for Conditions {
    fn default() -> Self {
        Self::new(
            Self::default_scale(),
            Self::default_bkg(),
            Self::default_dq(),
        )
    }
}

/// An underlayer inserted beneath a sample of interest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Underlayer {
    /// Thickness in Å.
    pub thick: f64,
    /// Real SLD.
    pub sld: f64,
}

/// A parameterised sample whose structure is rebuilt from parameter values.
///
/// Information calculations perturb copies of [`Sample::parameters`] and call
/// [`Sample::structure_with`], so the sample itself is never mutated while a
/// derivative is being taken.
pub trait Sample: Send + Sync {
    /// Sample name, used for output directories.
    fn name(&self) -> &str;

    /// Parameters the structure is built from.
    fn parameters(&self) -> &ParameterSet;

    /// Mutable access to the parameters.
    fn parameters_mut(&mut self) -> &mut ParameterSet;

    /// Structure obtained with the given parameter values.
    fn structure_with(&self, params: &ParameterSet) -> Result<Structure, ReflError>;

    /// Structure at the current parameter values.
    fn structure(&self) -> Result<Structure, ReflError> {
        self.structure_with(self.parameters())
    }

    /// Instrument conditions the sample is normally measured with.
    fn conditions(&self) -> Conditions {
        Conditions::default()
    }
}

/// A sample measured in several solvent contrasts.
pub trait ContrastSample: Sample {
    /// Structure in the given contrast with optional underlayers.
    fn contrast_structure(
        &self,
        params: &ParameterSet,
        contrast_sld: f64,
        underlayers: &[Underlayer],
    ) -> Result<Structure, ReflError>;

    /// Index of the parameter that changes during a kinetic experiment.
    fn kinetic_parameter(&self) -> Option<usize> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Sld,
    Thick,
}

/// Wraps a fixed structure and varies the SLD and thickness of each inner layer.
#[derive(Debug, Clone)]
pub struct LayeredSample {
    base: Structure,
    params: ParameterSet,
    bindings: Vec<(usize, Field, usize)>,
}

impl LayeredSample {
    /// Relative width of the bounds placed on each varying parameter.
    pub const BOUND_SIZE: f64 = 0.2;

    /// Wraps `structure` with the default bound size.
    pub fn new(structure: Structure) -> Result<Self, ReflError> {
        Self::with_bound_size(structure, Self::BOUND_SIZE)
    }

    /// Wraps `structure`, bounding each varying parameter to `±bound_size` of its value.
    pub fn with_bound_size(structure: Structure, bound_size: f64) -> Result<Self, ReflError> {
        structure.validate()?;
        if !(bound_size > 0.0 && bound_size < 1.0) {
            return Err(ReflError::Model(
                ErrorInfo::new("bound-size", "bound size must lie in (0, 1)")
                    .with_context("bound_size", bound_size.to_string()),
            ));
        }
        let mut params = ParameterSet::new();
        let mut bindings = Vec::new();
        for (idx, layer) in structure.layers().iter().enumerate() {
            if idx == 0 || idx + 1 == structure.len() {
                continue;
            }
            let sld = params.push(Parameter::varying(
                format!("{} SLD", layer.name),
                layer.sld,
                (layer.sld * (1.0 - bound_size), layer.sld * (1.0 + bound_size)),
            ));
            bindings.push((idx, Field::Sld, sld));
            let thick = params.push(Parameter::varying(
                format!("{} Thickness", layer.name),
                layer.thick,
                (layer.thick * (1.0 - bound_size), layer.thick * (1.0 + bound_size)),
            ));
            bindings.push((idx, Field::Thick, thick));
        }
        Ok(Self {
            base: structure,
            params,
            bindings,
        })
    }
}

impl Sample for LayeredSample {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    fn structure_with(&self, params: &ParameterSet) -> Result<Structure, ReflError> {
        let mut structure = self.base.clone();
        for &(layer_idx, field, param_idx) in &self.bindings {
            let value = params.value(param_idx)?;
            let layer = &mut structure.layers_mut()[layer_idx];
            match field {
                Field::Sld => layer.sld = value,
                Field::Thick => layer.thick = value,
            }
        }
        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;

    #[test]
    fn inner_layers_vary() {
        let structure = Layer::new("Air", 0.0)
            | Layer::new("Layer 1", 4.0).slab(100.0, 2.0)
            | Layer::new("Substrate", 2.047).with_rough(2.0);
        let sample = LayeredSample::new(structure.named("one")).unwrap();
        let params = sample.parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(
            params.get(0).unwrap().bounds,
            Some((4.0 * (1.0 - 0.2), 4.0 * (1.0 + 0.2)))
        );
        assert_eq!(params.get(1).unwrap().name, "Layer 1 Thickness");
    }

    #[test]
    fn structure_follows_parameters() {
        let structure = Layer::new("Air", 0.0)
            | Layer::new("Layer 1", 4.0).slab(100.0, 2.0)
            | Layer::new("Substrate", 2.047);
        let mut sample = LayeredSample::new(structure).unwrap();
        sample.parameters_mut().set_value(1, 120.0).unwrap();
        let rebuilt = sample.structure().unwrap();
        assert_eq!(rebuilt.layers()[1].thick, 120.0);
    }
}
