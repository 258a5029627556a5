//! Full-rank PCA decomposition of a standardized dataset.

use log::debug;
use ndarray::{Array1, Array2};
use ndarray_linalg::{Eigh, UPLO};

use crate::error::PcaError;
use crate::standardize::StandardizedDataset;

/// Eigenvector norms below this are treated as numerically zero.
const NORMALIZATION_THRESHOLD: f64 = 1e-9;

/// The immutable result of fitting PCA over a standardized dataset with F
/// features: F unit-norm, mutually orthogonal component vectors, their
/// eigenvalues, and the explained-variance ratios.
///
/// The rotation matrix is F x F with **components as columns**, ordered by
/// descending eigenvalue. Eigenvalues are clamped to be non-negative, since
/// near-singular inputs can produce tiny negative values from floating-point
/// noise.
#[derive(Debug, Clone)]
pub struct FittedDecomposition {
    rotation: Array2<f64>,
    eigenvalues: Array1<f64>,
    variance_ratios: Array1<f64>,
}

impl FittedDecomposition {
    /// Fits the decomposition by eigendecomposing the F x F feature
    /// covariance matrix `X^T X / (N - 1)` of the standardized data.
    ///
    /// All F components are retained; truncation happens at query time.
    /// Components are sorted by descending eigenvalue. Equal eigenvalues keep
    /// the order LAPACK's symmetric eigensolver produced (ascending output,
    /// reversed), which is implementation-defined but stable for a given
    /// input.
    ///
    /// # Errors
    ///
    /// Returns [`PcaError::Decomposition`] if the backend eigensolver fails.
    pub fn fit(data: &StandardizedDataset) -> Result<Self, PcaError> {
        let n_samples = data.n_observations();
        let n_features = data.n_features();

        let x = data.values();
        let mut cov_matrix = x.t().dot(x);
        cov_matrix /= (n_samples - 1) as f64;

        let (vals, vecs) = cov_matrix
            .eigh(UPLO::Upper)
            .map_err(|e| PcaError::Decomposition(e.to_string()))?;

        let mut eig_pairs: Vec<(f64, Array1<f64>)> = vals
            .into_iter()
            .zip(vecs.columns().into_iter().map(|col| col.to_owned()))
            .collect();
        eig_pairs.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let mut rotation = Array2::<f64>::zeros((n_features, n_features));
        let mut eigenvalues = Array1::<f64>::zeros(n_features);
        for (i, (eig_val, mut eig_vec)) in eig_pairs.into_iter().enumerate() {
            eigenvalues[i] = eig_val.max(0.0);
            let norm = eig_vec.dot(&eig_vec).sqrt();
            if norm > NORMALIZATION_THRESHOLD {
                eig_vec.mapv_inplace(|v| v / norm);
            } else {
                eig_vec.fill(0.0);
            }
            rotation.column_mut(i).assign(&eig_vec);
        }

        let total_variance = eigenvalues.sum();
        if total_variance <= 0.0 {
            return Err(PcaError::Decomposition(
                "all eigenvalues are zero; covariance matrix has no variance".to_string(),
            ));
        }
        let variance_ratios = &eigenvalues / total_variance;

        debug!(
            "fitted decomposition: {} components, leading eigenvalue {:.6}",
            n_features, eigenvalues[0]
        );

        Ok(Self {
            rotation,
            eigenvalues,
            variance_ratios,
        })
    }

    /// Expresses the standardized data in the component basis: the N x F
    /// matrix product of the data and the rotation.
    pub fn transform(&self, data: &StandardizedDataset) -> Array2<f64> {
        data.values().dot(&self.rotation)
    }

    /// F x F rotation matrix, components as columns, descending eigenvalue
    /// order.
    pub fn rotation(&self) -> &Array2<f64> {
        &self.rotation
    }

    /// Eigenvalues of the feature covariance matrix, descending, all >= 0.
    pub fn eigenvalues(&self) -> &Array1<f64> {
        &self.eigenvalues
    }

    /// Each eigenvalue divided by the eigenvalue sum; the ratios sum to 1.
    pub fn variance_ratios(&self) -> &Array1<f64> {
        &self.variance_ratios
    }

    /// Number of retained components (always F, the feature count).
    pub fn n_components(&self) -> usize {
        self.rotation.ncols()
    }
}
