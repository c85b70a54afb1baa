// mcl_core/src/estimation/particle.rs

use crate::types::PoseEstimate;

/// One weighted pose hypothesis.
///
/// `aux` carries any extra per-hypothesis state a driver wants to track
/// alongside the pose (e.g. a ball position relative to this particle). It is
/// copied together with the pose whenever the particle is selected during
/// resampling and is otherwise left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle<A = ()> {
    pub pose: PoseEstimate,
    /// Unnormalised between the measurement update and aggregation, normalised
    /// to sum to 1 across the population afterwards.
    pub weight: f64,
    pub aux: A,
}

impl<A: Default> Particle<A> {
    pub fn new(pose: PoseEstimate, weight: f64) -> Self {
        Self {
            pose,
            weight,
            aux: A::default(),
        }
    }
}

impl<A> Particle<A> {
    pub fn with_aux(pose: PoseEstimate, weight: f64, aux: A) -> Self {
        Self { pose, weight, aux }
    }
}
