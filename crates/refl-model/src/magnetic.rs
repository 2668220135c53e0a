//! Pt/YIG/GGG sample used to quantify proximity-induced magnetism in platinum.

use refl_core::errors::ReflError;
use refl_core::{Parameter, ParameterSet};

use crate::layer::{Layer, Magnetism};
use crate::sample::{Conditions, Sample};
use crate::structure::Structure;

const PT_SLD: usize = 0;
const PT_THICK: usize = 1;
const PT_ROUGH: usize = 2;
const PT_MAG: usize = 3;
const INTERMEDIARY_SLD: usize = 4;
const INTERMEDIARY_THICK: usize = 5;
const INTERMEDIARY_ROUGH: usize = 6;
const YIG_SLD: usize = 7;
const YIG_THICK: usize = 8;
const YIG_ROUGH: usize = 9;
const YIG_MAG: usize = 10;
const GGG_SLD: usize = 11;
const GGG_ROUGH: usize = 12;

/// Platinum on yttrium iron garnet grown on a gadolinium gallium garnet substrate.
///
/// The quantity of interest is the magnetic SLD induced in the platinum
/// (`pt_mag`), which is zero in the reference model.
#[derive(Debug, Clone)]
pub struct SampleYig {
    name: String,
    params: ParameterSet,
    mag_angle: f64,
    conditions: Conditions,
}

impl SampleYig {
    /// Sample with the fitted reference parameters and an unmagnetised Pt layer.
    pub fn new() -> Self {
        let params = vec![
            Parameter::varying("Pt SLD", 5.646, (5.0, 6.0)),
            Parameter::varying("Pt Thickness", 21.08, (15.0, 30.0)),
            Parameter::varying("Air/Pt Roughness", 8.211, (2.0, 10.0)),
            Parameter::varying("Pt Magnetic SLD", 0.0, (0.0, 0.2)),
            Parameter::varying("Intermediary SLD", 4.678, (4.0, 6.0)),
            Parameter::varying("Intermediary Thickness", 19.67, (10.0, 30.0)),
            Parameter::varying("Pt/Intermediary Roughness", 2.0, (1.0, 10.0)),
            Parameter::varying("YIG SLD", 5.836, (5.0, 6.0)),
            Parameter::varying("YIG Thickness", 713.8, (400.0, 900.0)),
            Parameter::varying("Intermediary/YIG Roughness", 13.55, (5.0, 20.0)),
            Parameter::varying("YIG Magnetic SLD", 0.349, (0.2, 0.6)),
            Parameter::varying("GGG SLD", 5.8, (5.0, 6.0)),
            Parameter::varying("YIG/GGG Roughness", 30.0, (15.0, 35.0)),
        ]
        .into_iter()
        .collect();
        Self {
            name: "YIG_sample".to_string(),
            params,
            mag_angle: 90.0,
            conditions: Conditions::new(1.001, 4e-7, 2.8),
        }
    }

    /// Index of the platinum magnetic SLD parameter.
    pub const fn pt_mag_index() -> usize {
        PT_MAG
    }

    /// Current platinum magnetic SLD.
    pub fn pt_mag(&self) -> f64 {
        self.params.value(PT_MAG).unwrap_or(0.0)
    }

    /// Sets the platinum magnetic SLD.
    pub fn set_pt_mag(&mut self, value: f64) -> Result<(), ReflError> {
        self.params.set_value(PT_MAG, value)
    }

    /// Parameters with the YIG and/or Pt thickness overridden.
    pub fn conditions_params(
        &self,
        yig_thick: Option<f64>,
        pt_thick: Option<f64>,
    ) -> Result<ParameterSet, ReflError> {
        let mut params = self.params.clone();
        if let Some(thick) = yig_thick {
            params.set_value(YIG_THICK, thick)?;
        }
        if let Some(thick) = pt_thick {
            params.set_value(PT_THICK, thick)?;
        }
        Ok(params)
    }

    /// Structure with the YIG and/or Pt thickness overridden.
    pub fn using_conditions(
        &self,
        yig_thick: Option<f64>,
        pt_thick: Option<f64>,
    ) -> Result<Structure, ReflError> {
        self.structure_with(&self.conditions_params(yig_thick, pt_thick)?)
    }
}

impl Default for SampleYig {
    fn default() -> Self {
        Self::new()
    }
}

impl Sample for SampleYig {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterSet {
        &mut self.params
    }

    fn structure_with(&self, params: &ParameterSet) -> Result<Structure, ReflError> {
        let magnetism = |idx: usize| -> Result<Magnetism, ReflError> {
            Ok(Magnetism {
                sld: params.value(idx)?,
                angle: self.mag_angle,
            })
        };
        // Stacked from the substrate up, as the sample was grown.
        let layers = vec![
            Layer::new("GGG", params.value(GGG_SLD)?).with_rough(params.value(GGG_ROUGH)?),
            Layer::new("YIG", params.value(YIG_SLD)?)
                .slab(params.value(YIG_THICK)?, params.value(YIG_ROUGH)?)
                .with_magnetism(magnetism(YIG_MAG)?),
            Layer::new("Intermediary", params.value(INTERMEDIARY_SLD)?).slab(
                params.value(INTERMEDIARY_THICK)?,
                params.value(INTERMEDIARY_ROUGH)?,
            ),
            Layer::new("Pt", params.value(PT_SLD)?)
                .slab(params.value(PT_THICK)?, params.value(PT_ROUGH)?)
                .with_magnetism(magnetism(PT_MAG)?),
            Layer::new("Air", 0.0),
        ];
        Ok(Structure::from_substrate_first(self.name.clone(), layers))
    }

    fn conditions(&self) -> Conditions {
        self.conditions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pt_mag_is_mutable() {
        let mut sample = SampleYig::new();
        assert_eq!(sample.pt_mag(), 0.0);
        sample.set_pt_mag(0.01).unwrap();
        let structure = sample.structure().unwrap();
        assert_eq!(structure.layers()[1].name, "Pt");
        assert_eq!(structure.layers()[1].magnetic_sld(), 0.01);
    }

    #[test]
    fn conditions_override_thicknesses() {
        let sample = SampleYig::new();
        let structure = sample.using_conditions(Some(500.0), Some(25.0)).unwrap();
        assert_eq!(structure.layers()[1].thick, 25.0);
        assert_eq!(structure.layers()[3].thick, 500.0);
        assert_eq!(sample.parameters().value(8).unwrap(), 713.8);
    }
}
