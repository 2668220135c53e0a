//! Abelès/Parratt specular reflectivity with Névot–Croce roughness.

use num_complex::Complex64;
use refl_model::Slab;

use std::f64::consts::PI;

/// Number of Gauss–Legendre nodes used for resolution smearing.
const RESOLUTION_POINTS: usize = 17;
/// Half width of the smearing window in standard deviations.
const RESOLUTION_LIMIT: f64 = 3.5;
/// FWHM to standard deviation for a Gaussian.
const FWHM: f64 = 2.354_820_045_030_949_3;

/// Unsmeared reflectivity of `slabs` at each momentum transfer in `q` (Å⁻¹).
pub fn abeles(q: &[f64], slabs: &[Slab]) -> Vec<f64> {
    q.iter().map(|&qi| abeles_point(qi, slabs)).collect()
}

fn abeles_point(q: f64, slabs: &[Slab]) -> f64 {
    let q = q.abs();
    if q < 1e-12 || slabs.len() < 2 {
        return 1.0;
    }
    let kz0 = Complex64::new(q * q / 4.0, 0.0);
    let front = Complex64::new(slabs[0].sld, slabs[0].isld) * 1e-6;
    let k: Vec<Complex64> = slabs
        .iter()
        .map(|slab| {
            let rho = Complex64::new(slab.sld, slab.isld) * 1e-6;
            (kz0 - 4.0 * PI * (rho - front)).sqrt()
        })
        .collect();

    // Recursion from the substrate upwards; the backing medium reflects nothing.
    let mut x = Complex64::new(0.0, 0.0);
    for j in (1..slabs.len()).rev() {
        let r = fresnel(k[j - 1], k[j], slabs[j].rough);
        let phase = (Complex64::i() * 2.0 * k[j] * slabs[j].thick).exp();
        let xp = x * phase;
        x = (r + xp) / (1.0 + r * xp);
    }
    x.norm_sqr()
}

fn fresnel(k1: Complex64, k2: Complex64, rough: f64) -> Complex64 {
    let sum = k1 + k2;
    if sum.norm() == 0.0 {
        return Complex64::new(0.0, 0.0);
    }
    (k1 - k2) / sum * (-2.0 * k1 * k2 * rough * rough).exp()
}

/// Reflectivity convolved with a Gaussian resolution of constant dQ/Q.
///
/// `dq` is the FWHM as a percentage of Q. Zero disables smearing.
pub fn smeared(q: &[f64], slabs: &[Slab], dq: f64) -> Vec<f64> {
    if dq <= 0.0 {
        return abeles(q, slabs);
    }
    let (nodes, weights) = gauss_legendre(RESOLUTION_POINTS);
    let kernel: Vec<f64> = nodes
        .iter()
        .zip(&weights)
        .map(|(&x, &w)| {
            let t = x * RESOLUTION_LIMIT;
            w * (-0.5 * t * t).exp()
        })
        .collect();
    let norm: f64 = kernel.iter().sum();

    q.iter()
        .map(|&qi| {
            let sigma = dq / 100.0 * qi.abs() / FWHM;
            let points: Vec<f64> = nodes
                .iter()
                .map(|&x| qi + x * RESOLUTION_LIMIT * sigma)
                .collect();
            abeles(&points, slabs)
                .iter()
                .zip(&kernel)
                .map(|(r, w)| r * w)
                .sum::<f64>()
                / norm
        })
        .collect()
}

/// Gauss–Legendre nodes and weights on [-1, 1].
pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];
    for i in 0..(n + 1) / 2 {
        let mut z = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        let mut derivative = 1.0;
        for _ in 0..100 {
            let mut p1 = 1.0;
            let mut p2 = 0.0;
            for j in 1..=n {
                let p3 = p2;
                p2 = p1;
                p1 = ((2 * j - 1) as f64 * z * p2 - (j - 1) as f64 * p3) / j as f64;
            }
            derivative = n as f64 * (z * p1 - p2) / (z * z - 1.0);
            let previous = z;
            z = previous - p1 / derivative;
            if (z - previous).abs() < 1e-15 {
                break;
            }
        }
        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        let w = 2.0 / ((1.0 - z * z) * derivative * derivative);
        weights[i] = w;
        weights[n - 1 - i] = w;
    }
    (nodes, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn substrate(sld: f64, rough: f64) -> Vec<Slab> {
        vec![
            Slab {
                thick: 0.0,
                sld: 0.0,
                isld: 0.0,
                rough: 0.0,
            },
            Slab {
                thick: 0.0,
                sld,
                isld: 0.0,
                rough,
            },
        ]
    }

    #[test]
    fn bare_substrate_matches_fresnel() {
        let slabs = substrate(2.07, 0.0);
        let q = 0.05;
        let k0 = q / 2.0;
        let k1 = (k0 * k0 - 4.0 * PI * 2.07e-6).sqrt();
        let expected = ((k0 - k1) / (k0 + k1)).powi(2);
        assert_relative_eq!(abeles(&[q], &slabs)[0], expected, max_relative = 1e-10);
    }

    #[test]
    fn total_reflection_below_critical_edge() {
        let slabs = substrate(2.07, 0.0);
        let qc = 4.0 * (PI * 2.07e-6).sqrt();
        let r = abeles(&[0.5 * qc], &slabs)[0];
        assert_relative_eq!(r, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn roughness_lowers_reflectivity() {
        let smooth = abeles(&[0.1], &substrate(2.07, 0.0))[0];
        let rough = abeles(&[0.1], &substrate(2.07, 5.0))[0];
        assert!(rough < smooth);
    }

    #[test]
    fn legendre_weights_integrate_polynomials() {
        let (nodes, weights) = gauss_legendre(RESOLUTION_POINTS);
        let sum: f64 = weights.iter().sum();
        assert_relative_eq!(sum, 2.0, max_relative = 1e-12);
        let x4: f64 = nodes.iter().zip(&weights).map(|(x, w)| w * x.powi(4)).sum();
        assert_relative_eq!(x4, 0.4, max_relative = 1e-10);
    }

    #[test]
    fn smearing_without_resolution_is_identity() {
        let slabs = substrate(2.07, 3.0);
        let q = [0.02, 0.05, 0.1];
        assert_eq!(smeared(&q, &slabs, 0.0), abeles(&q, &slabs));
    }
}
