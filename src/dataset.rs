use ndarray::Array2;

use crate::error::PcaError;

/// An immutable tabular dataset: named numeric feature columns over indexed
/// observation rows.
///
/// Construction validates the shape and rejects non-finite cells, so every
/// downstream stage can assume a dense, fully numeric N x F matrix. The
/// dataset is input-only and never mutated by the analysis.
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_names: Vec<String>,
    row_index: Vec<String>,
    values: Array2<f64>,
}

impl Dataset {
    /// Builds a dataset from named columns, a row index, and an N x F value
    /// matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the names or index do not match the matrix shape,
    /// if there are fewer than 2 rows or 2 columns, or if any cell is NaN or
    /// infinite (the "no missing values" invariant).
    pub fn new(
        feature_names: Vec<String>,
        row_index: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, PcaError> {
        let n_observations = values.nrows();
        let n_features = values.ncols();

        if feature_names.len() != n_features {
            return Err(PcaError::ShapeMismatch(format!(
                "{} feature names for {} value columns",
                feature_names.len(),
                n_features
            )));
        }
        if row_index.len() != n_observations {
            return Err(PcaError::ShapeMismatch(format!(
                "{} index entries for {} value rows",
                row_index.len(),
                n_observations
            )));
        }
        if n_features < 2 {
            return Err(PcaError::TooFewFeatures { n_features });
        }
        if n_observations < 2 {
            return Err(PcaError::TooFewObservations { n_observations });
        }

        for ((row, col), &cell) in values.indexed_iter() {
            if !cell.is_finite() {
                return Err(PcaError::NonFiniteValue {
                    feature: feature_names[col].clone(),
                    row,
                });
            }
        }

        Ok(Self {
            feature_names,
            row_index,
            values,
        })
    }

    /// Builds a dataset whose rows are indexed by their position, `"0".."N-1"`.
    pub fn with_positional_index(
        feature_names: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self, PcaError> {
        let row_index = (0..values.nrows()).map(|i| i.to_string()).collect();
        Self::new(feature_names, row_index, values)
    }

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

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}
