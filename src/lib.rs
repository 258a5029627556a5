// PCA projection engine: explained variance, 2D/3D projections, biplot arrows

#![doc = include_str!("../README.md")]

pub mod dataset;
pub mod decomposition;
pub mod engine;
pub mod error;
pub mod standardize;
pub mod tables;

pub use dataset::Dataset;
pub use decomposition::FittedDecomposition;
pub use engine::{ProjectionEngine, DEFAULT_COMPONENTS};
pub use error::PcaError;
pub use standardize::{standardize, StandardizedDataset};
pub use tables::{
    CoordinateTable, EigenvalueEntry, EigenvalueTable, ExplainedVarianceTable, FeatureArrow,
    LoadingTable, ProjectionResult, VarianceShare,
};

#[cfg(test)]
mod engine_tests;
