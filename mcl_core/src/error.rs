// mcl_core/src/error.rs

use thiserror::Error;

/// Construction-time contract violations. The filter itself has no runtime
/// failure modes; everything that can go wrong is caught here, once, before
/// the first cycle runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("particle count must be positive")]
    NoParticles,

    #[error("{name} must be finite and non-negative, got {value}")]
    NegativeCoefficient { name: &'static str, value: f64 },

    #[error("{name} must be finite and strictly positive, got {value}")]
    NonPositiveDeviation { name: &'static str, value: f64 },

    #[error("similarity floor must lie in (0, 1], got {0}")]
    InvalidSimilarityFloor(f64),

    #[error("effective sample size threshold must lie in (0, 1], got {0}")]
    InvalidResampleThreshold(f64),

    #[error("initial region has a negative or non-finite extent")]
    InvalidInitialRegion,

    #[error("initial pose must be finite, got ({x}, {y}, {h})")]
    NonFiniteInitialPose { x: f64, y: f64, h: f64 },

    #[error("the field landmark map contains no landmarks")]
    EmptyLandmarkMap,
}
