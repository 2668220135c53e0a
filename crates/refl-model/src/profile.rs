//! Depth-dependent scattering length density profiles.

use refl_core::errors::ReflError;

use crate::structure::{SpinState, Structure};

/// SLD profile of `structure` sampled at `points` depths.
///
/// Interfaces are smoothed with error functions of width equal to their
/// roughness. Depth zero is the first interface below the fronting medium.
pub fn sld_profile(
    structure: &Structure,
    spin: SpinState,
    points: usize,
) -> Result<(Vec<f64>, Vec<f64>), ReflError> {
    let slabs = structure.slabs(spin)?;
    let mut interfaces = Vec::with_capacity(slabs.len() - 1);
    let mut depth = 0.0;
    for idx in 1..slabs.len() {
        interfaces.push((depth, slabs[idx].rough, slabs[idx].sld - slabs[idx - 1].sld));
        depth += slabs[idx].thick;
    }

    let first_rough = interfaces.first().map(|i| i.1).unwrap_or(0.0);
    let (last_z, last_rough, _) = interfaces.last().copied().unwrap_or((0.0, 0.0, 0.0));
    let z_start = -(5.0 + 4.0 * first_rough);
    let z_end = last_z + 5.0 + 4.0 * last_rough;
    let points = points.max(2);
    let step = (z_end - z_start) / (points - 1) as f64;

    let z: Vec<f64> = (0..points).map(|i| z_start + step * i as f64).collect();
    let sld = z
        .iter()
        .map(|&zi| {
            interfaces
                .iter()
                .fold(slabs[0].sld, |acc, &(position, rough, delta)| {
                    acc + delta * step_fraction(zi - position, rough)
                })
        })
        .collect();
    Ok((z, sld))
}

fn step_fraction(distance: f64, rough: f64) -> f64 {
    if rough <= 0.0 {
        return if distance < 0.0 { 0.0 } else { 1.0 };
    }
    0.5 * (1.0 + erf(distance / (rough * std::f64::consts::SQRT_2)))
}

/// Error function, Abramowitz & Stegun 7.1.26 (|ε| < 1.5e-7).
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    sign * (1.0 - poly * (-x * x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use approx::assert_abs_diff_eq;

    #[test]
    fn erf_reference_values() {
        assert_abs_diff_eq!(erf(0.0), 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(erf(1.0), 0.842_700_79, epsilon = 1e-6);
        assert_abs_diff_eq!(erf(-2.0), -0.995_322_27, epsilon = 1e-6);
    }

    #[test]
    fn profile_reaches_both_media() {
        let structure = Layer::new("Air", 0.0)
            | Layer::new("Film", 4.0).slab(100.0, 2.0)
            | Layer::new("Substrate", 2.07).with_rough(2.0);
        let (z, sld) = sld_profile(&structure, SpinState::Unpolarised, 400).unwrap();
        assert_eq!(z.len(), 400);
        assert_abs_diff_eq!(sld[0], 0.0, epsilon = 1e-3);
        assert_abs_diff_eq!(*sld.last().unwrap(), 2.07, epsilon = 1e-3);
        let mid = z.iter().position(|&zi| zi >= 50.0).unwrap();
        assert_abs_diff_eq!(sld[mid], 4.0, epsilon = 1e-3);
    }
}
