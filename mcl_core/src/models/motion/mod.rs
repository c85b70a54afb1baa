// mcl_core/src/models/motion/mod.rs

use nalgebra::{Rotation2, Vector2};
use rand::Rng;

use crate::config::MotionNoise;
use crate::models::sample_gaussian;
use crate::types::{normalize_angle, MotionDelta, PoseEstimate};

/// The odometry motion model: how a single pose hypothesis moves given one
/// robot-relative `MotionDelta`.
///
/// Noise is zero-mean Gaussian and proportional to the size of the move, so
/// standing still never adds uncertainty and long strides add the most.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdometryMotionModel {
    pub noise: MotionNoise,
}

impl OdometryMotionModel {
    pub fn new(noise: MotionNoise) -> Self {
        Self { noise }
    }

    /// Standard deviations (forward, lateral, rotational) for this delta.
    pub fn noise_deviations(&self, delta: &MotionDelta) -> (f64, f64, f64) {
        let t = delta.translation();
        (
            self.noise.forward * t,
            self.noise.lateral * t,
            self.noise.rotational * delta.rotational.abs() + self.noise.translation_to_rotation * t,
        )
    }

    /// Draws one noisy realisation of `delta`.
    pub fn sample_delta<R: Rng + ?Sized>(&self, delta: &MotionDelta, rng: &mut R) -> MotionDelta {
        let (sd_f, sd_l, sd_r) = self.noise_deviations(delta);
        MotionDelta {
            forward: delta.forward + sample_gaussian(rng, sd_f),
            lateral: delta.lateral + sample_gaussian(rng, sd_l),
            rotational: delta.rotational + sample_gaussian(rng, sd_r),
        }
    }

    /// Applies `delta` to `pose` without noise.
    ///
    /// The translation is expressed in the robot frame, so it is rotated by the
    /// pose's own heading before being added. Heading is updated additively and
    /// rewrapped.
    pub fn apply(pose: &PoseEstimate, delta: &MotionDelta) -> PoseEstimate {
        let step = Rotation2::new(pose.h) * Vector2::new(delta.forward, delta.lateral);
        PoseEstimate {
            x: pose.x + step.x,
            y: pose.y + step.y,
            h: normalize_angle(pose.h + delta.rotational),
        }
    }

    /// Predicts the next pose of one particle: sample noise, then apply.
    pub fn predict<R: Rng + ?Sized>(
        &self,
        pose: &PoseEstimate,
        delta: &MotionDelta,
        rng: &mut R,
    ) -> PoseEstimate {
        Self::apply(pose, &self.sample_delta(delta, rng))
    }
}
