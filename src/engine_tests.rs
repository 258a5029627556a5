use crate::dataset::Dataset;
use crate::engine::ProjectionEngine;
use crate::error::PcaError;

use approx::assert_abs_diff_eq;
use ndarray::{s, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Iris-shaped synthetic data: `n_per_class` observations for each of three
/// classes, four features, class means separated well beyond the noise.
fn iris_like(n_per_class: usize, seed: u64) -> (Dataset, Vec<String>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.4).unwrap();
    let class_means: [[f64; 4]; 3] = [
        [5.0, 3.4, 1.5, 0.2],
        [5.9, 2.8, 4.3, 1.3],
        [6.6, 3.0, 5.6, 2.0],
    ];
    let class_names = ["setosa", "versicolor", "virginica"];

    let n_rows = 3 * n_per_class;
    let mut values = Array2::<f64>::zeros((n_rows, 4));
    let mut labels = Vec::with_capacity(n_rows);
    for (class, means) in class_means.iter().enumerate() {
        for i in 0..n_per_class {
            let row = class * n_per_class + i;
            for (col, &mean) in means.iter().enumerate() {
                values[[row, col]] = mean + noise.sample(&mut rng);
            }
            labels.push(class_names[class].to_string());
        }
    }

    let feature_names = vec![
        "sepal_length".to_string(),
        "sepal_width".to_string(),
        "petal_length".to_string(),
        "petal_width".to_string(),
    ];
    let dataset = Dataset::with_positional_index(feature_names, values).unwrap();
    (dataset, labels)
}

fn iris_engine() -> (ProjectionEngine, Vec<String>) {
    let (dataset, labels) = iris_like(50, 1234);
    (ProjectionEngine::new(dataset).unwrap(), labels)
}

#[test]
fn explained_variance_is_ranked_cumulative_and_complete() {
    let (engine, _) = iris_engine();
    let table = engine.explained_variance();

    assert_eq!(table.rows.len(), 4);
    let mut previous_cumulative = 0.0;
    for (i, row) in table.rows.iter().enumerate() {
        assert_eq!(row.rank, i + 1);
        assert!(row.ratio >= 0.0);
        assert!(row.cumulative >= previous_cumulative);
        previous_cumulative = row.cumulative;
    }
    assert_abs_diff_eq!(table.rows.last().unwrap().cumulative, 1.0, epsilon = 1e-9);
}

#[test]
fn eigenvalue_table_is_ranked_and_descending() {
    let (engine, _) = iris_engine();
    let table = engine.eigenvalues();

    assert_eq!(table.rows.len(), 4);
    for (i, row) in table.rows.iter().enumerate() {
        assert_eq!(row.rank, i + 1);
        assert!(row.eigenvalue >= 0.0);
    }
    for pair in table.rows.windows(2) {
        assert!(pair[0].eigenvalue >= pair[1].eigenvalue);
    }
}

#[test]
fn components_returns_feature_by_component_loadings() {
    let (engine, _) = iris_engine();
    let loadings = engine.components(2).unwrap();

    assert_eq!(loadings.values.dim(), (4, 2));
    assert_eq!(loadings.component_names, vec!["PC1", "PC2"]);
    assert_eq!(loadings.feature_names.len(), 4);

    // Each column is a unit-norm component vector.
    for col in loadings.values.columns() {
        assert_abs_diff_eq!(col.dot(&col).sqrt(), 1.0, epsilon = 1e-6);
    }
}

#[test]
fn components_beyond_feature_count_is_a_range_error() {
    let (engine, _) = iris_engine();
    let err = engine.components(5).unwrap_err();
    assert!(matches!(
        err,
        PcaError::ComponentRangeExceeded {
            requested: 5,
            available: 4
        }
    ));
}

#[test]
fn projection_rank_outside_two_or_three_returns_no_result() {
    let (engine, labels) = iris_engine();
    assert!(engine.projection(&labels, 4, false).unwrap().is_none());
    assert!(engine.projection(&labels, 1, true).unwrap().is_none());
    assert!(engine.projection(&labels, 0, false).unwrap().is_none());
}

#[test]
fn projection_rejects_mismatched_labels() {
    let (engine, mut labels) = iris_engine();
    labels.pop();
    let err = engine.projection(&labels, 2, false).unwrap_err();
    assert!(matches!(
        err,
        PcaError::LabelCountMismatch {
            n_labels: 149,
            n_observations: 150
        }
    ));
}

#[test]
fn two_dimensional_projection_with_overlay_matches_iris_shape() {
    let (engine, labels) = iris_engine();
    let result = engine.projection(&labels, 2, true).unwrap().unwrap();

    assert_eq!(result.n_components, 2);
    assert_eq!(result.coordinates.values.dim(), (150, 2));
    assert_eq!(result.coordinates.labels.len(), 150);
    assert_eq!(result.coordinates.row_index.len(), 150);
    assert_eq!(result.coordinates.component_names, vec!["PC1", "PC2"]);
    assert_eq!(result.loadings.values.dim(), (4, 2));
    assert_eq!(result.feature_arrows.unwrap().len(), 4);
}

#[test]
fn three_dimensional_projection_never_carries_arrows() {
    let (engine, labels) = iris_engine();
    let result = engine.projection(&labels, 3, true).unwrap().unwrap();

    assert_eq!(result.n_components, 3);
    assert_eq!(result.coordinates.values.dim(), (150, 3));
    assert_eq!(result.loadings.values.dim(), (4, 3));
    assert!(result.feature_arrows.is_none());
}

#[test]
fn overlay_disabled_omits_arrows_in_two_dimensions() {
    let (engine, labels) = iris_engine();
    let result = engine.projection(&labels, 2, false).unwrap().unwrap();
    assert!(result.feature_arrows.is_none());
}

#[test]
fn arrows_share_one_positive_scale_and_keep_direction() {
    let (dataset, labels) = iris_like(10, 77);
    // Drop one feature so F = 3, N = 30.
    let trimmed = Dataset::with_positional_index(
        dataset.feature_names()[..3].to_vec(),
        dataset.values().slice(s![.., ..3]).to_owned(),
    )
    .unwrap();
    let engine = ProjectionEngine::new(trimmed).unwrap();

    let result = engine.projection(&labels[..30], 2, true).unwrap().unwrap();
    let arrows = result.feature_arrows.unwrap();
    assert_eq!(arrows.len(), 3);

    let mut scales = Vec::new();
    for (arrow, loading) in arrows.iter().zip(result.loadings.values.rows()) {
        for (&tip, &raw) in [arrow.x, arrow.y].iter().zip(loading.iter()) {
            if raw.abs() > 1e-9 {
                scales.push(tip / raw);
            }
        }
    }
    assert!(!scales.is_empty());
    let first = scales[0];
    assert!(first.is_finite() && first > 0.0);
    for &scale in &scales {
        assert_abs_diff_eq!(scale, first, epsilon = 1e-9);
    }
}

#[test]
fn reconstruction_error_shrinks_as_rank_grows() {
    let (engine, _) = iris_engine();
    let standardized = engine.standardized().values().clone();
    let scores = engine.decomposition().transform(engine.standardized());
    let rotation = engine.decomposition().rotation();

    let mut errors = Vec::new();
    for k in 2..=4 {
        let coords = scores.slice(s![.., ..k]);
        let loadings = rotation.slice(s![.., ..k]);
        let reconstructed = coords.dot(&loadings.t());
        let error: f64 = (&standardized - &reconstructed).mapv(|v| v * v).sum();
        errors.push(error);
    }

    assert!(errors[0] >= errors[1]);
    assert!(errors[1] >= errors[2]);
    // Full rank reproduces the standardized data.
    assert_abs_diff_eq!(errors[2], 0.0, epsilon = 1e-9);
}

#[test]
fn construction_fails_on_zero_variance_feature() {
    let mut values = Array2::<f64>::zeros((10, 3));
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let noise = Normal::new(0.0, 1.0).unwrap();
    for row in 0..10 {
        values[[row, 0]] = noise.sample(&mut rng);
        values[[row, 1]] = noise.sample(&mut rng);
        values[[row, 2]] = 42.0;
    }
    let dataset = Dataset::with_positional_index(
        vec!["a".to_string(), "b".to_string(), "constant".to_string()],
        values,
    )
    .unwrap();

    let err = ProjectionEngine::new(dataset).unwrap_err();
    match err {
        PcaError::ZeroVarianceFeature { feature } => assert_eq!(feature, "constant"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn projection_result_serializes_for_a_renderer() {
    let (engine, labels) = iris_engine();
    let result = engine.projection(&labels, 2, true).unwrap().unwrap();
    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"n_components\":2"));
    assert!(json.contains("sepal_length"));
}
