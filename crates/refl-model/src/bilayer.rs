//! Supported DMPC bilayer on an oxidised silicon substrate.

use refl_core::errors::ReflError;
use refl_core::{Parameter, ParameterSet};

use crate::layer::Layer;
use crate::sample::{ContrastSample, Sample, Underlayer};
use crate::structure::Structure;

const SI_ROUGH: usize = 0;
const SIO2_THICK: usize = 1;
const SIO2_ROUGH: usize = 2;
const SIO2_SOLV: usize = 3;
const DMPC_APM: usize = 4;
const BILAYER_ROUGH: usize = 5;
const BILAYER_SOLV: usize = 6;
const HG_WATERS: usize = 7;

/// D2O contrast SLD.
pub const D2O_SLD: f64 = 6.36;
/// H2O contrast SLD.
pub const H2O_SLD: f64 = -0.56;

/// Roughness given to inserted underlayers.
const UNDERLAYER_ROUGH: f64 = 2.0;

/// Symmetric DMPC bilayer measured through the silicon substrate.
///
/// Headgroup and tailgroup thicknesses follow from the molecular volumes and
/// the area per molecule, so a change in `apm` (for example while the bilayer
/// is attacked by a peptide) thins or thickens the whole membrane.
#[derive(Debug, Clone)]
pub struct BilayerDmpc {
    name: String,
    params: ParameterSet,
    si_sld: f64,
    sio2_sld: f64,
    hg_vol: f64,
    tg_vol: f64,
    tg_sl: f64,
    water_vol: f64,
}

impl BilayerDmpc {
    /// Bilayer with the reference parameter values and bounds.
    pub fn new() -> Self {
        let params = vec![
            Parameter::varying("Si/SiO2 Roughness", 2.0, (1.0, 8.0)),
            Parameter::varying("SiO2 Thickness", 14.7, (5.0, 20.0)),
            Parameter::varying("SiO2/DMPC Roughness", 2.0, (1.0, 8.0)),
            Parameter::varying("SiO2 Hydration", 0.245, (0.0, 1.0)),
            Parameter::varying("DMPC Area Per Molecule", 49.9, (30.0, 60.0)),
            Parameter::varying("Bilayer Roughness", 6.57, (1.0, 8.0)),
            Parameter::varying("Bilayer Hydration", 0.074, (0.0, 1.0)),
            Parameter::varying("Headgroup Bound Waters", 3.59, (0.0, 20.0)),
        ]
        .into_iter()
        .collect();
        Self {
            name: "DMPC_bilayer".to_string(),
            params,
            si_sld: 2.073,
            sio2_sld: 3.41,
            hg_vol: 320.9,
            tg_vol: 783.3,
            tg_sl: -3.08e-4,
            water_vol: 30.4,
        }
    }

    /// Tailgroup SLD from its scattering length and volume.
    pub fn tailgroup_sld(&self) -> f64 {
        self.tg_sl / self.tg_vol * 1e6
    }

    /// Structure in the given contrast with optional underlayers.
    pub fn using_conditions(
        &self,
        contrast_sld: f64,
        underlayers: &[Underlayer],
    ) -> Result<Structure, ReflError> {
        self.contrast_structure(&self.params, contrast_sld, underlayers)
    }
}

impl Default for BilayerDmpc {
    fn default() -> Self {
        Self::new()
    }
}

impl Sample for BilayerDmpc {
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
        self.contrast_structure(params, D2O_SLD, &[])
    }
}

impl ContrastSample for BilayerDmpc {
    fn contrast_structure(
        &self,
        params: &ParameterSet,
        contrast_sld: f64,
        underlayers: &[Underlayer],
    ) -> Result<Structure, ReflError> {
        let apm = params.value(DMPC_APM)?;
        let bilayer_rough = params.value(BILAYER_ROUGH)?;
        let bilayer_solv = params.value(BILAYER_SOLV)?;

        let hg_sld = contrast_sld * 0.27 + 1.98 * 0.73;
        let hg_thick = (self.hg_vol + params.value(HG_WATERS)? * self.water_vol) / apm;
        let tg_thick = self.tg_vol / apm;
        let tg_sld = self.tailgroup_sld();

        let mut structure = Layer::new("Si", self.si_sld)
            | Layer::new("SiO2", self.sio2_sld)
                .slab(params.value(SIO2_THICK)?, params.value(SI_ROUGH)?)
                .with_vfsolv(params.value(SIO2_SOLV)?);
        for (idx, underlayer) in underlayers.iter().enumerate() {
            structure = structure
                | Layer::new(format!("Underlayer {}", idx + 1), underlayer.sld)
                    .slab(underlayer.thick, UNDERLAYER_ROUGH);
        }
        let headgroup = |rough: f64| {
            Layer::new("DMPC Headgroup", hg_sld)
                .slab(hg_thick, rough)
                .with_vfsolv(bilayer_solv)
        };
        let tailgroup = Layer::new("DMPC Tailgroup", tg_sld)
            .slab(tg_thick, bilayer_rough)
            .with_vfsolv(bilayer_solv);

        let structure = structure
            | headgroup(params.value(SIO2_ROUGH)?)
            | tailgroup.clone()
            | tailgroup
            | headgroup(bilayer_rough)
            | Layer::new("Solution", contrast_sld).with_rough(bilayer_rough);
        Ok(structure.named(self.name.clone()))
    }

    fn kinetic_parameter(&self) -> Option<usize> {
        Some(DMPC_APM)
    }
}
