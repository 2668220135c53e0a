//! Layers and their magnetism.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::structure::Structure;

/// Magnetic scattering length density carried by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Magnetism {
    /// Magnetic SLD in 1e-6 Å⁻².
    pub sld: f64,
    /// In-plane magnetisation angle in degrees (90 aligns with the guide field).
    #[serde(default = "Magnetism::default_angle")]
    pub angle: f64,
}

impl Magnetism {
    const fn default_angle() -> f64 {
        90.0
    }

    /// Magnetism aligned with the guide field.
    pub fn aligned(sld: f64) -> Self {
        Self {
            sld,
            angle: Self::default_angle(),
        }
    }
}

/// One slab of a layered sample.
///
/// SLDs are expressed in units of 1e-6 Å⁻² and lengths in Å. The roughness is
/// that of the interface between this layer and the one above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name, used in parameter names.
    pub name: String,
    /// Real SLD.
    pub sld: f64,
    /// Imaginary (absorption) SLD.
    #[serde(default)]
    pub isld: f64,
    /// Thickness; zero for the fronting and backing media.
    #[serde(default)]
    pub thick: f64,
    /// Roughness of the interface at the top of the layer.
    #[serde(default)]
    pub rough: f64,
    /// Volume fraction of solvent (backing medium) mixed into the layer.
    #[serde(default)]
    pub vfsolv: f64,
    /// Magnetic SLD and angle, absent for non-magnetic layers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnetism: Option<Magnetism>,
}

impl Layer {
    /// Creates an infinitely thin, smooth material of the given SLD.
    pub fn new(name: impl Into<String>, sld: f64) -> Self {
        Self {
            name: name.into(),
            sld,
            isld: 0.0,
            thick: 0.0,
            rough: 0.0,
            vfsolv: 0.0,
            magnetism: None,
        }
    }

    /// Gives the material a thickness and a roughness, turning it into a slab.
    pub fn slab(mut self, thick: f64, rough: f64) -> Self {
        self.thick = thick;
        self.rough = rough;
        self
    }

    /// Sets the roughness of the interface above the layer.
    pub fn with_rough(mut self, rough: f64) -> Self {
        self.rough = rough;
        self
    }

    /// Sets the imaginary SLD.
    pub fn with_isld(mut self, isld: f64) -> Self {
        self.isld = isld;
        self
    }

    /// Sets the volume fraction of solvent in the layer.
    pub fn with_vfsolv(mut self, vfsolv: f64) -> Self {
        self.vfsolv = vfsolv;
        self
    }

    /// Makes the layer magnetic.
    pub fn with_magnetism(mut self, magnetism: Magnetism) -> Self {
        self.magnetism = Some(magnetism);
        self
    }

    /// Magnetic SLD of the layer, zero when non-magnetic.
    pub fn magnetic_sld(&self) -> f64 {
        self.magnetism.map(|m| m.sld).unwrap_or(0.0)
    }
}

impl BitOr<Layer> for Layer {
    type Output = Structure;

    fn bitor(self, rhs: Layer) -> Structure {
        Structure::from_layers("", vec![self, rhs])
    }
}
