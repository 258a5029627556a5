use thiserror::Error;

/// Errors surfaced by dataset construction, the decomposition, and the
/// projection queries.
///
/// Construction errors abort the whole analysis. Query-level errors are
/// local: the engine stays usable and the caller can issue a new query.
/// An out-of-range projection rank is deliberately *not* represented here;
/// it is a tolerant input error reported as `Ok(None)` by
/// [`crate::ProjectionEngine::projection`].
#[derive(Debug, Error)]
pub enum PcaError {
    /// PCA is undefined for fewer than 2 feature columns.
    #[error("dataset must have at least 2 feature columns, got {n_features}")]
    TooFewFeatures { n_features: usize },

    /// Variance is undefined for fewer than 2 observations.
    #[error("dataset must have at least 2 observations, got {n_observations}")]
    TooFewObservations { n_observations: usize },

    /// A NaN or infinite cell, i.e. a missing or non-numeric value.
    #[error("non-finite value in feature '{feature}' at row {row}")]
    NonFiniteValue { feature: String, row: usize },

    /// Feature names or row index do not match the value matrix shape.
    #[error("dataset shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A constant column cannot be scaled to unit variance.
    #[error("feature '{feature}' has zero variance; standardization is undefined")]
    ZeroVarianceFeature { feature: String },

    /// More components requested than the decomposition holds.
    #[error("requested {requested} components but only {available} are available")]
    ComponentRangeExceeded { requested: usize, available: usize },

    /// Caller contract violation: one label per observation is required.
    #[error("label count ({n_labels}) does not match observation count ({n_observations})")]
    LabelCountMismatch {
        n_labels: usize,
        n_observations: usize,
    },

    /// The median loading norm is zero, so arrow scaling would divide by zero.
    #[error("median loading norm is zero; cannot scale biplot feature arrows")]
    DegenerateLoadings,

    /// Failure reported by the eigendecomposition backend.
    #[error("eigendecomposition failed: {0}")]
    Decomposition(String),
}
