// mcl_core/src/estimation/mod.rs

use crate::messages::LandmarkObservation;
use crate::types::{MotionDelta, PoseEstimate, PoseUncertainty};

/// The contract for any algorithm that performs the "pose estimator" role.
/// Drivers are written against this trait so the filter behind it can be
/// swapped without touching the control loop.
pub trait PoseEstimator: Send {
    /// Runs one full cycle: motion update, measurement update (skipped when
    /// `observations` is empty), aggregation and, if due, resampling.
    fn update_localization(&mut self, delta: MotionDelta, observations: &[LandmarkObservation]);

    /// The pose published by the last completed cycle.
    fn estimate(&self) -> PoseEstimate;

    /// One standard deviation per component of `estimate()`.
    fn uncertainty(&self) -> PoseUncertainty;
}

pub mod aggregation;
pub mod filters;
pub mod particle;
pub mod resampling;
