// mcl_core/src/prelude.rs

// --- Core Abstractions ---
pub use crate::estimation::PoseEstimator;
pub use crate::messages::{LandmarkAssociation, LandmarkObservation, LineSighting, PointSighting};

// --- Core Data Structures ---
pub use crate::estimation::particle::Particle;
pub use crate::mapping::{standard_field, FieldBounds, FieldLandmarkMap, LandmarkId, LineLandmark, PointLandmark};
pub use crate::types::{normalize_angle, MotionDelta, PoseEstimate, PoseUncertainty};

// --- Configuration ---
pub use crate::config::{
    InitialDistribution, LineLikelihood, MclConfig, MotionNoise, PointLikelihood, ResamplePolicy,
    ResamplingConfig, ResamplingNoise,
};
pub use crate::error::ConfigError;

// --- Estimation Algorithms ---
pub use crate::estimation::filters::MonteCarloLocalization;
