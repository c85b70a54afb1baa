// mcl_sim/src/simulation/config/structs.rs

use mcl_core::config::{MclConfig, MotionNoise};
use mcl_core::types::{MotionDelta, PoseEstimate};
use serde::{Deserialize, Serialize};

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # ScenarioConfig
/// The root of the data parsed from a `scenario.toml` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: Simulation,

    #[serde(default)]
    pub robot: RobotConfig,

    /// Noise of the odometry the robot *reports*, relative to what it did.
    #[serde(default = "default_odometry_noise")]
    pub odometry: MotionNoise,

    #[serde(default)]
    pub vision: VisionConfig,

    /// Passed through to the estimator untouched.
    #[serde(default)]
    pub filter: MclConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            simulation: Simulation::default(),
            robot: RobotConfig::default(),
            odometry: default_odometry_noise(),
            vision: VisionConfig::default(),
            filter: MclConfig::default(),
        }
    }
}

fn default_odometry_noise() -> MotionNoise {
    MotionNoise {
        forward: 0.05,
        lateral: 0.05,
        rotational: 0.05,
        translation_to_rotation: 0.001,
    }
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Simulation {
    /// Optional seed for the pseudo-random number generator for determinism.
    pub seed: Option<u64>,
    /// Number of control cycles to simulate.
    pub cycles: usize,
    /// A vision frame arrives every `vision_period` control cycles.
    pub vision_period: usize,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            seed: None,
            cycles: 300,
            vision_period: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RobotConfig {
    pub start_pose: PoseEstimate,
    /// Commanded per-cycle motion, played in order and looped.
    pub command: Vec<CommandSegment>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            start_pose: PoseEstimate::new(-150.0, 0.0, 0.0),
            command: vec![
                CommandSegment {
                    cycles: 30,
                    forward: 8.0,
                    lateral: 0.0,
                    rotational: 0.0,
                },
                CommandSegment {
                    cycles: 20,
                    forward: 4.0,
                    lateral: 0.0,
                    rotational: 0.08,
                },
            ],
        }
    }
}

/// Hold one motion command for `cycles` control cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSegment {
    pub cycles: usize,
    #[serde(default)]
    pub forward: f64,
    #[serde(default)]
    pub lateral: f64,
    #[serde(default)]
    pub rotational: f64,
}

impl CommandSegment {
    pub fn delta(&self) -> MotionDelta {
        MotionDelta::new(self.forward, self.lateral, self.rotational)
    }
}

/// How much landmark identity the simulated vision reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdentityMode {
    /// Every sighting names its landmark.
    #[default]
    Known,
    /// Sightings list every landmark that looks the same under the field's
    /// symmetries (e.g. both posts of a goal, all four corners).
    Candidates,
    /// No identity at all.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct VisionConfig {
    /// Landmarks farther than this (cm) are not seen.
    pub max_distance: f64,
    /// Full horizontal opening angle of the camera, in degrees.
    pub field_of_view_deg: f64,
    pub distance_sd: f64,
    /// Additional distance noise per cm of range.
    pub distance_sd_per_cm: f64,
    pub bearing_sd: f64,
    pub orientation_sd: f64,
    pub identity: IdentityMode,
    /// Whether field lines are reported at all.
    pub lines: bool,
    /// Attach the true noise deviations to every sighting.
    pub report_deviations: bool,
    /// Probability per vision frame of a phantom detection that matches no
    /// real landmark.
    pub spurious_rate: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            max_distance: 450.0,
            field_of_view_deg: 120.0,
            distance_sd: 3.0,
            distance_sd_per_cm: 0.03,
            bearing_sd: 0.03,
            orientation_sd: 0.05,
            identity: IdentityMode::Known,
            lines: true,
            report_deviations: false,
            spurious_rate: 0.0,
        }
    }
}
