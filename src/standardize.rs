//! Z-score standardization of a dataset ahead of the decomposition.

use log::debug;
use ndarray::{Array1, Array2, Axis};

use crate::dataset::Dataset;
use crate::error::PcaError;

/// A standard deviation below this is treated as zero variance.
const ZERO_VARIANCE_THRESHOLD: f64 = 1e-12;

/// A dataset whose columns have been centered to mean 0 and scaled to unit
/// variance, together with the fitted mean and scale vectors.
///
/// The shape, feature names, and row index of the source [`Dataset`] are
/// preserved. Standard deviations are population (ddof 0), computed from the
/// dataset itself; there is no separate train/test split in this pipeline.
#[derive(Debug, Clone)]
pub struct StandardizedDataset {
    feature_names: Vec<String>,
    row_index: Vec<String>,
    values: Array2<f64>,
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardizedDataset {
    pub fn n_observations(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn row_index(&self) -> &[String] {
        &self.row_index
    }

    /// The standardized N x F value matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Per-feature means of the source dataset.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Per-feature population standard deviations of the source dataset.
    /// Every entry is strictly positive.
    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}

/// Centers and scales every feature column of `dataset` to mean 0 and unit
/// variance.
///
/// Pure transform: the input dataset is not modified.
///
/// # Errors
///
/// Returns [`PcaError::ZeroVarianceFeature`] naming the first constant
/// column, rather than dividing by zero and letting NaN propagate into the
/// decomposition.
pub fn standardize(dataset: &Dataset) -> Result<StandardizedDataset, PcaError> {
    let mut values = dataset.values().to_owned();

    let mean = values.mean_axis(Axis(0)).ok_or_else(|| {
        PcaError::ShapeMismatch("cannot compute column means of an empty dataset".to_string())
    })?;
    values -= &mean;

    // Population standard deviation (ddof 0) of the already-centered columns.
    let scale = values.map_axis(Axis(0), |column| column.std(0.0));
    for (col, &std_dev) in scale.iter().enumerate() {
        if std_dev < ZERO_VARIANCE_THRESHOLD {
            return Err(PcaError::ZeroVarianceFeature {
                feature: dataset.feature_names()[col].clone(),
            });
        }
    }
    values /= &scale;

    debug!(
        "standardized {} observations x {} features",
        values.nrows(),
        values.ncols()
    );

    Ok(StandardizedDataset {
        feature_names: dataset.feature_names().to_vec(),
        row_index: dataset.row_index().to_vec(),
        values,
        mean,
        scale,
    })
}
