//! Structures, spin channels and stacking order.

use std::ops::BitOr;

use refl_core::errors::{ErrorInfo, ReflError};
use serde::{Deserialize, Serialize};

use crate::layer::Layer;

/// Neutron spin channel used when evaluating a magnetic structure.
///
/// The first half of each name is the incident spin and the second the
/// analysed spin, so `UpDown` is the `pm` channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpinState {
    /// Unpolarised beam, no magnetic contrast.
    Unpolarised,
    /// `pp` channel.
    UpUp,
    /// `pm` channel.
    UpDown,
    /// `mp` channel.
    DownUp,
    /// `mm` channel.
    DownDown,
}

impl SpinState {
    /// Short channel label (`pp`, `pm`, `mp`, `mm`).
    pub fn label(&self) -> &'static str {
        match self {
            SpinState::Unpolarised => "unpolarised",
            SpinState::UpUp => "pp",
            SpinState::UpDown => "pm",
            SpinState::DownUp => "mp",
            SpinState::DownDown => "mm",
        }
    }

    /// Whether the channel flips the neutron spin.
    pub fn is_spin_flip(&self) -> bool {
        matches!(self, SpinState::UpDown | SpinState::DownUp)
    }

    /// Sign applied to the magnetic SLD for non spin-flip channels.
    pub fn magnetic_sign(&self) -> f64 {
        match self {
            SpinState::UpUp => 1.0,
            SpinState::DownDown => -1.0,
            _ => 0.0,
        }
    }
}

/// Which end of the stack is listed first.
///
/// refnx lists the ambient (fronting) medium first, Refl1D lists the
/// substrate first. Each layer keeps its own thickness and the roughness of
/// the interface at its top in both conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackOrder {
    /// refnx order.
    AmbientFirst,
    /// Refl1D order.
    SubstrateFirst,
}

/// Effective slab handed to the reflectivity kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slab {
    /// Thickness in Å.
    pub thick: f64,
    /// Real SLD, magnetic contribution included.
    pub sld: f64,
    /// Imaginary SLD.
    pub isld: f64,
    /// Roughness of the interface at the top of the slab.
    pub rough: f64,
}

/// A layered sample, ambient (fronting) medium first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Name of the sample the structure belongs to.
    pub name: String,
    layers: Vec<Layer>,
}

impl Structure {
    /// Structure from layers listed ambient first.
    pub fn from_layers(name: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self {
            name: name.into(),
            layers,
        }
    }

    /// Builds a structure from layers listed substrate first (Refl1D order).
    pub fn from_substrate_first(name: impl Into<String>, mut layers: Vec<Layer>) -> Self {
        layers.reverse();
        Self::from_layers(name, layers)
    }

    /// Renames the structure.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Layers, ambient first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access to the layers.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Layers between the fronting and backing media.
    pub fn inner_layers(&self) -> &[Layer] {
        if self.layers.len() < 2 {
            return &[];
        }
        &self.layers[1..self.layers.len() - 1]
    }

    /// Number of layers, media included.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the structure has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in the requested stacking order.
    pub fn ordered(&self, order: StackOrder) -> Vec<Layer> {
        match order {
            StackOrder::AmbientFirst => self.layers.clone(),
            StackOrder::SubstrateFirst => self.to_substrate_first(),
        }
    }

    /// Layers listed substrate first, as Refl1D stacks them.
    pub fn to_substrate_first(&self) -> Vec<Layer> {
        self.layers.iter().rev().cloned().collect()
    }

    /// Whether any layer carries a magnetic SLD.
    pub fn is_magnetic(&self) -> bool {
        self.layers
            .iter()
            .any(|layer| layer.magnetism.map(|m| m.sld != 0.0).unwrap_or(false))
    }

    /// Checks that the structure can be handed to the reflectivity kernel.
    pub fn validate(&self) -> Result<(), ReflError> {
        if self.layers.len() < 2 {
            return Err(ReflError::Model(
                ErrorInfo::new(
                    "structure-too-short",
                    "a structure needs a fronting and a backing medium",
                )
                .with_context("structure", self.name.clone())
                .with_context("layers", self.layers.len().to_string()),
            ));
        }
        for layer in &self.layers {
            let finite = [layer.sld, layer.isld, layer.thick, layer.rough, layer.vfsolv]
                .iter()
                .all(|value| value.is_finite());
            if !finite || layer.thick < 0.0 || layer.rough < 0.0 {
                return Err(invalid_layer(
                    self,
                    layer,
                    "thickness and roughness must be finite and non-negative",
                ));
            }
            if !(0.0..=1.0).contains(&layer.vfsolv) {
                return Err(invalid_layer(self, layer, "solvent fraction must lie in [0, 1]"));
            }
            if let Some(magnetism) = layer.magnetism {
                if !magnetism.sld.is_finite() || !magnetism.angle.is_finite() {
                    return Err(invalid_layer(self, layer, "magnetic SLD must be finite"));
                }
            }
        }
        Ok(())
    }

    /// Effective slabs for the given spin channel.
    ///
    /// Solvent fractions mix each inner layer with the backing medium. Spin
    /// flip channels see the nuclear SLD only.
    pub fn slabs(&self, spin: SpinState) -> Result<Vec<Slab>, ReflError> {
        self.validate()?;
        let backing = &self.layers[self.layers.len() - 1];
        let last = self.layers.len() - 1;
        let sign = spin.magnetic_sign();
        Ok(self
            .layers
            .iter()
            .enumerate()
            .map(|(idx, layer)| {
                let magnetic = layer
                    .magnetism
                    .map(|m| m.sld * m.angle.to_radians().sin())
                    .unwrap_or(0.0);
                let nuclear = layer.sld + sign * magnetic;
                let (sld, isld) = if idx == 0 || idx == last {
                    (nuclear, layer.isld)
                } else {
                    (
                        (1.0 - layer.vfsolv) * nuclear + layer.vfsolv * backing.sld,
                        (1.0 - layer.vfsolv) * layer.isld + layer.vfsolv * backing.isld,
                    )
                };
                Slab {
                    thick: if idx == 0 || idx == last { 0.0 } else { layer.thick },
                    sld,
                    isld,
                    rough: if idx == 0 { 0.0 } else { layer.rough },
                }
            })
            .collect())
    }
}

impl BitOr<Layer> for Structure {
    type Output = Structure;

    fn bitor(mut self, rhs: Layer) -> Structure {
        self.layers.push(rhs);
        self
    }
}

fn invalid_layer(structure: &Structure, layer: &Layer, message: &str) -> ReflError {
    ReflError::Model(
        ErrorInfo::new("layer-invalid", message)
            .with_context("structure", structure.name.clone())
            .with_context("layer", layer.name.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film() -> Structure {
        (Layer::new("Air", 0.0)
            | Layer::new("Film", 4.0).slab(100.0, 3.0).with_vfsolv(0.5)
            | Layer::new("Substrate", 2.0).with_rough(2.0))
        .named("film")
    }

    #[test]
    fn stacking_keeps_ambient_first() {
        let structure = film();
        let names: Vec<_> = structure.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Air", "Film", "Substrate"]);
        assert_eq!(structure.inner_layers().len(), 1);
    }

    #[test]
    fn substrate_first_round_trip() {
        let structure = film();
        let reversed = structure.to_substrate_first();
        assert_eq!(reversed[0].name, "Substrate");
        assert_eq!(reversed[0].rough, 2.0);
        let back = Structure::from_substrate_first("film", reversed);
        assert_eq!(back, structure);
    }

    #[test]
    fn solvent_mixes_with_backing_medium() {
        let slabs = film().slabs(SpinState::Unpolarised).unwrap();
        assert_eq!(slabs[1].sld, 3.0);
        assert_eq!(slabs[0].rough, 0.0);
        assert_eq!(slabs[2].thick, 0.0);
    }

    #[test]
    fn rejects_negative_thickness() {
        let bad = Layer::new("Air", 0.0) | Layer::new("Film", 1.0).slab(-1.0, 0.0);
        assert!(bad.validate().is_err());
        let single = Structure::from_layers("single", vec![Layer::new("Air", 0.0)]);
        assert!(single.validate().is_err());
    }
}
