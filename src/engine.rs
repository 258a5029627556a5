//! The query façade over one fitted analysis session.

use log::{info, warn};
use ndarray::{s, Array2};

use crate::dataset::Dataset;
use crate::decomposition::FittedDecomposition;
use crate::error::PcaError;
use crate::standardize::{standardize, StandardizedDataset};
use crate::tables::{
    component_names, CoordinateTable, EigenvalueEntry, EigenvalueTable, ExplainedVarianceTable,
    FeatureArrow, LoadingTable, ProjectionResult, VarianceShare,
};

/// Component count used by callers that do not care to choose one.
pub const DEFAULT_COMPONENTS: usize = 2;

/// Keeps scaled arrows inside the visible cloud of observation points.
const ARROW_DAMPING: f64 = 0.75;

/// A median loading norm below this would make arrow scaling divide by zero.
const DEGENERATE_NORM_THRESHOLD: f64 = 1e-12;

/// Owns the standardized dataset and its fitted decomposition for one
/// analysis session, and answers four queries: explained-variance summary,
/// eigenvalue summary, low-dimensional projection (with optional feature
/// overlay), and raw components.
///
/// The engine is effectively immutable after construction. Every query is a
/// pure function of the fitted state plus its arguments, so a shared engine
/// can serve concurrent read-only queries.
#[derive(Debug)]
pub struct ProjectionEngine {
    standardized: StandardizedDataset,
    decomposition: FittedDecomposition,
}

impl ProjectionEngine {
    /// Standardizes `dataset` and fits the full-rank decomposition.
    ///
    /// # Errors
    ///
    /// Fails fast, before any decomposition is attempted, if the dataset has
    /// fewer than 2 columns or fewer than 2 rows. Also propagates
    /// standardization errors (zero-variance columns) and eigensolver
    /// failures.
    pub fn new(dataset: Dataset) -> Result<Self, PcaError> {
        let n_features = dataset.n_features();
        let n_observations = dataset.n_observations();
        if n_features < 2 {
            return Err(PcaError::TooFewFeatures { n_features });
        }
        if n_observations < 2 {
            return Err(PcaError::TooFewObservations { n_observations });
        }

        let standardized = standardize(&dataset)?;
        let decomposition = FittedDecomposition::fit(&standardized)?;
        info!(
            "fitted PCA session over {} observations x {} features",
            n_observations, n_features
        );

        Ok(Self {
            standardized,
            decomposition,
        })
    }

    /// Explained-variance ratio and its running cumulative sum for component
    /// ranks `1..=F`.
    ///
    /// The cumulative column is non-decreasing and ends at 1.0 within
    /// floating-point tolerance.
    pub fn explained_variance(&self) -> ExplainedVarianceTable {
        let mut cumulative = 0.0;
        let rows = self
            .decomposition
            .variance_ratios()
            .iter()
            .enumerate()
            .map(|(i, &ratio)| {
                cumulative += ratio;
                VarianceShare {
                    rank: i + 1,
                    ratio,
                    cumulative,
                }
            })
            .collect();
        ExplainedVarianceTable { rows }
    }

    /// The F eigenvalues, 1-indexed by component rank, descending.
    pub fn eigenvalues(&self) -> EigenvalueTable {
        let rows = self
            .decomposition
            .eigenvalues()
            .iter()
            .enumerate()
            .map(|(i, &eigenvalue)| EigenvalueEntry {
                rank: i + 1,
                eigenvalue,
            })
            .collect();
        EigenvalueTable { rows }
    }

    /// The first `n_components` component vectors as an F x k loading table,
    /// features as rows and components as columns.
    ///
    /// # Errors
    ///
    /// Returns [`PcaError::ComponentRangeExceeded`] if `n_components` is
    /// larger than the feature count.
    pub fn components(&self, n_components: usize) -> Result<LoadingTable, PcaError> {
        let available = self.decomposition.n_components();
        if n_components > available {
            return Err(PcaError::ComponentRangeExceeded {
                requested: n_components,
                available,
            });
        }
        let values = self
            .decomposition
            .rotation()
            .slice(s![.., ..n_components])
            .to_owned();
        Ok(LoadingTable {
            feature_names: self.standardized.feature_names().to_vec(),
            component_names: component_names(n_components),
            values,
        })
    }

    /// Projects the observations onto the first `n_components` components.
    ///
    /// Valid ranks are 2 and 3. Any other rank is a tolerant input error:
    /// a diagnostic is logged and `Ok(None)` is returned so the caller can
    /// retry with a valid rank. `labels` must hold one entry per observation;
    /// they are attached to the coordinate table together with the original
    /// row index.
    ///
    /// With `with_feature_overlay` set and a 2D rank, the result also carries
    /// one scaled biplot arrow per feature.
    ///
    /// # Errors
    ///
    /// Returns [`PcaError::LabelCountMismatch`] when the label count differs
    /// from the observation count, [`PcaError::ComponentRangeExceeded`] when
    /// the rank exceeds the feature count, and
    /// [`PcaError::DegenerateLoadings`] if arrow scaling would divide by
    /// zero.
    pub fn projection(
        &self,
        labels: &[String],
        n_components: usize,
        with_feature_overlay: bool,
    ) -> Result<Option<ProjectionResult>, PcaError> {
        if n_components != 2 && n_components != 3 {
            warn!(
                "projection rank must be 2 or 3, got {}; returning no result",
                n_components
            );
            return Ok(None);
        }

        let n_observations = self.standardized.n_observations();
        if labels.len() != n_observations {
            return Err(PcaError::LabelCountMismatch {
                n_labels: labels.len(),
                n_observations,
            });
        }

        let loadings = self.components(n_components)?;

        let scores = self.decomposition.transform(&self.standardized);
        let coordinates = scores.slice(s![.., ..n_components]).to_owned();

        let feature_arrows = if with_feature_overlay && n_components == 2 {
            Some(self.scaled_feature_arrows(&coordinates, &loadings)?)
        } else {
            None
        };

        Ok(Some(ProjectionResult {
            n_components,
            coordinates: CoordinateTable {
                component_names: component_names(n_components),
                values: coordinates,
                labels: labels.to_vec(),
                row_index: self.standardized.row_index().to_vec(),
            },
            loadings,
            feature_arrows,
        }))
    }

    /// Rescales the 2-component loading vectors into the coordinate frame of
    /// the transformed observations.
    ///
    /// Unit-norm components make raw loadings tiny next to the observation
    /// cloud. The shared scale is the ratio of the median observation norm to
    /// the median loading norm, damped by a fixed constant, so arrows are
    /// neither invisible nor dominant. Every arrow keeps its direction; only
    /// the magnitude changes, by the same positive scalar for all features.
    fn scaled_feature_arrows(
        &self,
        coordinates: &Array2<f64>,
        loadings: &LoadingTable,
    ) -> Result<Vec<FeatureArrow>, PcaError> {
        let observation_norms: Vec<f64> = coordinates
            .rows()
            .into_iter()
            .map(|row| row.dot(&row).sqrt())
            .collect();
        let loading_norms: Vec<f64> = loadings
            .values
            .rows()
            .into_iter()
            .map(|row| row.dot(&row).sqrt())
            .collect();

        let median_loading_norm = median(loading_norms);
        if median_loading_norm < DEGENERATE_NORM_THRESHOLD {
            return Err(PcaError::DegenerateLoadings);
        }
        let scale = median(observation_norms) / median_loading_norm * ARROW_DAMPING;

        Ok(loadings
            .feature_names
            .iter()
            .zip(loadings.values.rows())
            .map(|(feature, loading)| FeatureArrow {
                feature: feature.clone(),
                x: loading[0] * scale,
                y: loading[1] * scale,
            })
            .collect())
    }

    /// The standardized dataset this session was fitted on.
    pub fn standardized(&self) -> &StandardizedDataset {
        &self.standardized
    }

    /// The fitted decomposition backing every query.
    pub fn decomposition(&self) -> &FittedDecomposition {
        &self.decomposition
    }
}

/// Median with even-length samples averaged over the two middle values.
fn median(mut values: Vec<f64>) -> f64 {
    debug_assert!(!values.is_empty());
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
