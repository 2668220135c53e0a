//! Scalar summaries of a Fisher information matrix.

use nalgebra::{DMatrix, SymmetricEigen};
use serde::{Deserialize, Serialize};

/// Eigenvalue ratio below which a matrix is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Eigenvalues of a symmetric information matrix in ascending order.
pub fn eigenvalues(g: &DMatrix<f64>) -> Vec<f64> {
    if g.is_empty() {
        return Vec::new();
    }
    let sym = 0.5 * (g + g.transpose());
    let mut values: Vec<f64> = SymmetricEigen::new(sym).eigenvalues.iter().copied().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Smallest eigenvalue, or zero for an empty matrix.
///
/// This is the quantity maximised when comparing designs: it bounds the
/// information on the worst determined combination of parameters.
pub fn min_eigenvalue(g: &DMatrix<f64>) -> f64 {
    eigenvalues(g).first().copied().unwrap_or(0.0)
}

/// Summary of an information matrix over named parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FisherSummary {
    /// Names of the parameters, in matrix order.
    pub parameters: Vec<String>,
    /// Eigenvalues in ascending order.
    pub eigenvalues: Vec<f64>,
    /// Smallest eigenvalue.
    pub min_eigenvalue: f64,
    /// Information on each parameter alone, `g[i, i]`.
    pub diagonal: Vec<f64>,
    /// `sqrt(diag(g⁻¹))`, present when the matrix is invertible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cramer_rao: Option<Vec<f64>>,
    /// `ln det g`, present when the matrix is positive definite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ln_det: Option<f64>,
}

impl FisherSummary {
    /// Summarises `g`, whose rows follow `parameters`.
    pub fn new(parameters: Vec<String>, g: &DMatrix<f64>) -> Self {
        let eigenvalues = eigenvalues(g);
        let min_eigenvalue = eigenvalues.first().copied().unwrap_or(0.0);
        let diagonal = g.diagonal().iter().copied().collect();
        let positive = match (eigenvalues.first(), eigenvalues.last()) {
            (Some(&lo), Some(&hi)) => lo > hi * SINGULAR_TOLERANCE && lo > 0.0,
            _ => false,
        };
        let ln_det = positive.then(|| eigenvalues.iter().map(|v| v.ln()).sum());
        let cramer_rao = if positive {
            g.clone().try_inverse().and_then(|inv| {
                inv.diagonal()
                    .iter()
                    .map(|&v| (v >= 0.0).then(|| v.sqrt()))
                    .collect::<Option<Vec<f64>>>()
            })
        } else {
            None
        };
        Self {
            parameters,
            eigenvalues,
            min_eigenvalue,
            diagonal,
            cramer_rao,
            ln_det,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn diagonal_matrix_summary() {
        let g = DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 9.0]);
        let summary = FisherSummary::new(vec!["a".into(), "b".into()], &g);
        assert_relative_eq!(summary.min_eigenvalue, 4.0, epsilon = 1e-12);
        assert_eq!(summary.diagonal, vec![4.0, 9.0]);
        let bounds = summary.cramer_rao.unwrap();
        assert_relative_eq!(bounds[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(bounds[1], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(summary.ln_det.unwrap(), 36.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn singular_matrix_has_no_bounds() {
        let g = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let summary = FisherSummary::new(vec!["a".into(), "b".into()], &g);
        assert!(summary.min_eigenvalue.abs() < 1e-12);
        assert!(summary.cramer_rao.is_none());
        assert!(summary.ln_det.is_none());
    }

    #[test]
    fn empty_matrix() {
        let g = DMatrix::<f64>::zeros(0, 0);
        assert_eq!(min_eigenvalue(&g), 0.0);
        assert!(FisherSummary::new(Vec::new(), &g).eigenvalues.is_empty());
    }
}
