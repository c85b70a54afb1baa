// mcl_core/src/config.rs

//! Tuning parameters for the particle filter.
//!
//! Every struct deserializes from a TOML/figment table and every field has a
//! default, so a scenario only needs to mention what it changes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{PoseEstimate, PoseUncertainty};

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # MclConfig
/// All options recognised by `MonteCarloLocalization`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MclConfig {
    /// Number of particles M. Fixed for the lifetime of the estimator.
    pub particle_count: usize,
    pub motion_noise: MotionNoise,
    pub point_likelihood: PointLikelihood,
    pub line_likelihood: LineLikelihood,
    /// Lower bound for the similarity of a single observation. Keeps one
    /// spurious sighting from zeroing an otherwise good particle.
    pub similarity_floor: f64,
    pub resampling: ResamplingConfig,
    pub initial_distribution: InitialDistribution,
}

impl Default for MclConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            motion_noise: MotionNoise::default(),
            point_likelihood: PointLikelihood::default(),
            line_likelihood: LineLikelihood::default(),
            similarity_floor: 1.0e-3,
            resampling: ResamplingConfig::default(),
            initial_distribution: InitialDistribution::UniformField,
        }
    }
}

impl MclConfig {
    /// Checks every construction-time contract. Called by the estimator
    /// constructor; a config that passes here can never fail later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::NoParticles);
        }

        non_negative("motion_noise.forward", self.motion_noise.forward)?;
        non_negative("motion_noise.lateral", self.motion_noise.lateral)?;
        non_negative("motion_noise.rotational", self.motion_noise.rotational)?;
        non_negative(
            "motion_noise.translation_to_rotation",
            self.motion_noise.translation_to_rotation,
        )?;

        positive(
            "point_likelihood.distance_sd_base",
            self.point_likelihood.distance_sd_base,
        )?;
        non_negative(
            "point_likelihood.distance_sd_per_cm",
            self.point_likelihood.distance_sd_per_cm,
        )?;
        positive("point_likelihood.bearing_sd", self.point_likelihood.bearing_sd)?;

        positive(
            "line_likelihood.distance_sd_base",
            self.line_likelihood.distance_sd_base,
        )?;
        non_negative(
            "line_likelihood.distance_sd_per_cm",
            self.line_likelihood.distance_sd_per_cm,
        )?;
        positive("line_likelihood.bearing_sd", self.line_likelihood.bearing_sd)?;
        positive(
            "line_likelihood.orientation_sd",
            self.line_likelihood.orientation_sd,
        )?;

        if !(self.similarity_floor > 0.0 && self.similarity_floor <= 1.0) {
            return Err(ConfigError::InvalidSimilarityFloor(self.similarity_floor));
        }

        if let ResamplePolicy::EffectiveSampleSize { threshold } = self.resampling.policy {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(ConfigError::InvalidResampleThreshold(threshold));
            }
        }
        non_negative("resampling.noise.xy", self.resampling.noise.xy)?;
        non_negative("resampling.noise.h", self.resampling.noise.h)?;

        self.initial_distribution.validate()
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeCoefficient { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDeviation { name, value })
    }
}

// =========================================================================
// == Motion Model ==
// =========================================================================

/// Proportional odometry noise. With `t = hypot(forward, lateral)`:
/// `sd_forward = forward * t`, `sd_lateral = lateral * t`,
/// `sd_rotational = rotational * |rotation| + translation_to_rotation * t`.
/// All zero means the motion update is exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MotionNoise {
    pub forward: f64,
    pub lateral: f64,
    pub rotational: f64,
    /// Heading noise (rad) per centimetre travelled.
    pub translation_to_rotation: f64,
}

impl Default for MotionNoise {
    fn default() -> Self {
        Self {
            forward: 0.1,
            lateral: 0.1,
            rotational: 0.1,
            translation_to_rotation: 0.002,
        }
    }
}

impl MotionNoise {
    pub const NONE: MotionNoise = MotionNoise {
        forward: 0.0,
        lateral: 0.0,
        rotational: 0.0,
        translation_to_rotation: 0.0,
    };
}

// =========================================================================
// == Measurement Model ==
// =========================================================================

/// Gaussian decay parameters for point landmarks (goal posts, corners).
/// The distance deviation grows with the measured distance:
/// `sd = distance_sd_base + distance_sd_per_cm * distance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PointLikelihood {
    pub distance_sd_base: f64,
    pub distance_sd_per_cm: f64,
    pub bearing_sd: f64,
}

impl Default for PointLikelihood {
    fn default() -> Self {
        Self {
            distance_sd_base: 15.0,
            distance_sd_per_cm: 0.1,
            bearing_sd: 0.15,
        }
    }
}

/// Gaussian decay parameters for line landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LineLikelihood {
    pub distance_sd_base: f64,
    pub distance_sd_per_cm: f64,
    pub bearing_sd: f64,
    pub orientation_sd: f64,
}

impl Default for LineLikelihood {
    fn default() -> Self {
        Self {
            distance_sd_base: 15.0,
            distance_sd_per_cm: 0.1,
            bearing_sd: 0.2,
            orientation_sd: 0.2,
        }
    }
}

// =========================================================================
// == Resampling ==
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ResamplingConfig {
    pub policy: ResamplePolicy,
    pub noise: ResamplingNoise,
}

/// When to redraw the population. Cycles without observations never resample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResamplePolicy {
    /// Resample on every cycle that carried observations.
    #[default]
    Always,
    /// Resample only when `ESS < threshold * M`.
    EffectiveSampleSize { threshold: f64 },
}

/// Gaussian roughening applied to every resampled particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ResamplingNoise {
    /// Standard deviation in cm, applied to x and y independently.
    pub xy: f64,
    /// Standard deviation in radians.
    pub h: f64,
}

impl Default for ResamplingNoise {
    fn default() -> Self {
        Self { xy: 1.0, h: 0.01 }
    }
}

impl ResamplingNoise {
    pub const NONE: ResamplingNoise = ResamplingNoise { xy: 0.0, h: 0.0 };
}

// =========================================================================
// == Initial Belief ==
// =========================================================================

/// How the population is drawn at construction and on `reset_uniform`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InitialDistribution {
    /// Uniform over the field bounds of the landmark map, any heading.
    #[default]
    UniformField,
    /// Uniform in a box of ± half extents around a centre pose.
    UniformRegion {
        center: PoseEstimate,
        half_extent_x: f64,
        half_extent_y: f64,
        #[serde(default)]
        half_extent_h: f64,
    },
    /// Gaussian around a known start pose.
    Seeded {
        pose: PoseEstimate,
        spread: PoseUncertainty,
    },
}

impl InitialDistribution {
    fn validate(&self) -> Result<(), ConfigError> {
        let (center, extents) = match self {
            InitialDistribution::UniformField => return Ok(()),
            InitialDistribution::UniformRegion {
                center,
                half_extent_x,
                half_extent_y,
                half_extent_h,
            } => (center, [*half_extent_x, *half_extent_y, *half_extent_h]),
            InitialDistribution::Seeded { pose, spread } => (pose, [spread.x, spread.y, spread.h]),
        };
        if ![center.x, center.y, center.h].iter().all(|v| v.is_finite()) {
            return Err(ConfigError::NonFiniteInitialPose {
                x: center.x,
                y: center.y,
                h: center.h,
            });
        }
        if extents.iter().all(|e| e.is_finite() && *e >= 0.0) {
            Ok(())
        } else {
            Err(ConfigError::InvalidInitialRegion)
        }
    }
}
