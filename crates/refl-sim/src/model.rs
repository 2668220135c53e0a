//! Model reflectivity of a structure in given conditions.

use refl_core::errors::{ErrorInfo, ReflError};
use refl_model::{Conditions, SpinState, Structure};

use crate::kernel;

/// A structure together with the instrument conditions and spin channel it is measured in.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectModel {
    /// Layers being measured.
    pub structure: Structure,
    /// Scale, background and resolution.
    pub conditions: Conditions,
    /// Spin channel; unpolarised by default.
    pub spin: SpinState,
}

impl ReflectModel {
    /// Unpolarised model of `structure`.
    pub fn new(structure: Structure, conditions: Conditions) -> Self {
        Self {
            structure,
            conditions,
            spin: SpinState::Unpolarised,
        }
    }

    /// Evaluates the model in spin channel `spin`.
    pub fn with_spin(mut self, spin: SpinState) -> Self {
        self.spin = spin;
        self
    }

    /// Model reflectivity at each Q, including scale and background.
    pub fn reflectivity(&self, q: &[f64]) -> Result<Vec<f64>, ReflError> {
        reflectivity(q, self)
    }
}

/// Model reflectivity of `model` at each Q, including scale and background.
///
/// Magnetism is taken to be collinear with the guide field, so spin-flip
/// channels carry background only. An unpolarised beam on a magnetic
/// structure sees the mean of the two non spin-flip channels.
pub fn reflectivity(q: &[f64], model: &ReflectModel) -> Result<Vec<f64>, ReflError> {
    let Conditions { scale, bkg, dq } = model.conditions;
    if !(scale.is_finite() && bkg.is_finite() && dq.is_finite()) || dq < 0.0 {
        return Err(ReflError::Simulation(
            ErrorInfo::new("conditions-invalid", "scale, background and resolution must be finite")
                .with_context("scale", scale.to_string())
                .with_context("bkg", bkg.to_string())
                .with_context("dq", dq.to_string()),
        ));
    }
    let specular = match model.spin {
        SpinState::UpDown | SpinState::DownUp => {
            model.structure.validate()?;
            vec![0.0; q.len()]
        }
        SpinState::Unpolarised if model.structure.is_magnetic() => {
            let up = kernel::smeared(q, &model.structure.slabs(SpinState::UpUp)?, dq);
            let down = kernel::smeared(q, &model.structure.slabs(SpinState::DownDown)?, dq);
            up.iter().zip(&down).map(|(u, d)| 0.5 * (u + d)).collect()
        }
        spin => kernel::smeared(q, &model.structure.slabs(spin)?, dq),
    };
    Ok(specular.into_iter().map(|r| scale * r + bkg).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refl_model::{Layer, Magnetism};

    fn magnetic_film() -> Structure {
        Layer::new("Air", 0.0)
            | Layer::new("Film", 4.0)
                .slab(50.0, 2.0)
                .with_magnetism(Magnetism::aligned(1.0))
            | Layer::new("Substrate", 2.07)
    }

    #[test]
    fn spin_flip_channels_are_background_only() {
        let model =
            ReflectModel::new(magnetic_film(), Conditions::new(1.0, 1e-6, 2.0)).with_spin(SpinState::UpDown);
        let r = model.reflectivity(&[0.02, 0.05]).unwrap();
        assert_eq!(r, vec![1e-6, 1e-6]);
    }

    #[test]
    fn spin_channels_split_for_magnetic_layers() {
        let conditions = Conditions::new(1.0, 0.0, 0.0);
        let q = [0.03];
        let up = ReflectModel::new(magnetic_film(), conditions)
            .with_spin(SpinState::UpUp)
            .reflectivity(&q)
            .unwrap();
        let down = ReflectModel::new(magnetic_film(), conditions)
            .with_spin(SpinState::DownDown)
            .reflectivity(&q)
            .unwrap();
        let unpolarised = ReflectModel::new(magnetic_film(), conditions)
            .reflectivity(&q)
            .unwrap();
        assert_ne!(up, down);
        assert!((unpolarised[0] - 0.5 * (up[0] + down[0])).abs() < 1e-15);
    }

    #[test]
    fn negative_resolution_is_rejected() {
        let model = ReflectModel::new(magnetic_film(), Conditions::new(1.0, 0.0, -1.0));
        assert!(model.reflectivity(&[0.1]).is_err());
    }
}
