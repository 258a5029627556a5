//! Result shapes consumed by a rendering collaborator.
//!
//! Every query of [`crate::ProjectionEngine`] bottoms out in one of these
//! plain, serde-serializable structures. The crate has no opinion on how they
//! are drawn; a plotting front end (scatter, bar/Pareto, scree) can consume
//! them directly, and they are well-formed whether or not a renderer exists.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One row of the explained-variance summary: the share of total variance
/// captured by the component at `rank` (1-based), plus the running cumulative
/// share up to and including that rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceShare {
    pub rank: usize,
    pub ratio: f64,
    pub cumulative: f64,
}

/// Explained-variance table over all F component ranks.
///
/// `rows[i].cumulative` is non-decreasing in `i` and the final entry is 1.0
/// within floating-point tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainedVarianceTable {
    pub rows: Vec<VarianceShare>,
}

/// One eigenvalue, keyed by 1-based component rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EigenvalueEntry {
    pub rank: usize,
    pub eigenvalue: f64,
}

/// Eigenvalue table over all F component ranks, descending. This is the
/// input of a scree plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EigenvalueTable {
    pub rows: Vec<EigenvalueEntry>,
}

/// An F x k loading matrix: one row per original feature, one column per
/// retained component. Columns are named `PC1..PCk`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadingTable {
    pub feature_names: Vec<String>,
    pub component_names: Vec<String>,
    pub values: Array2<f64>,
}

/// An N x k coordinate matrix of observations in the reduced space, carrying
/// the caller-supplied labels and the original row index as two extra columns
/// for downstream grouping and hover display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinateTable {
    pub component_names: Vec<String>,
    pub values: Array2<f64>,
    pub labels: Vec<String>,
    pub row_index: Vec<String>,
}

/// A biplot arrow: the line segment from the origin to `(x, y)`, annotated
/// with the feature it represents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureArrow {
    pub feature: String,
    pub x: f64,
    pub y: f64,
}

/// Everything a renderer needs for a 2D/3D projection chart.
///
/// `feature_arrows` is present only for 2D projections requested with the
/// feature overlay enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub n_components: usize,
    pub loadings: LoadingTable,
    pub coordinates: CoordinateTable,
    pub feature_arrows: Option<Vec<FeatureArrow>>,
}

/// `PC1..PCk` column names, shared by loading and coordinate tables.
pub(crate) fn component_names(n_components: usize) -> Vec<String> {
    (1..=n_components).map(|i| format!("PC{i}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_names_are_one_based() {
        assert_eq!(component_names(3), vec!["PC1", "PC2", "PC3"]);
    }

    #[test]
    fn tables_serialize_to_json() {
        let table = EigenvalueTable {
            rows: vec![EigenvalueEntry {
                rank: 1,
                eigenvalue: 2.5,
            }],
        };
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"rank\":1"));
        assert!(json.contains("\"eigenvalue\":2.5"));
    }
}
