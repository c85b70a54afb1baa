// mcl_core/src/types.rs

use nalgebra::{Isometry2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

// --- Angle Helpers ---

/// Wraps an angle in radians into the half-open interval (−π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return angle;
    }
    let mut wrapped = angle.rem_euclid(TAU); // [0, 2π)
    if wrapped > PI {
        wrapped -= TAU;
    }
    wrapped
}

/// Signed shortest difference `a - b`, wrapped into (−π, π].
pub fn angle_difference(a: f64, b: f64) -> f64 {
    normalize_angle(a - b)
}

/// Difference between two *directionless* line orientations, wrapped into
/// (−π/2, π/2]. A line seen from either end has the same orientation.
pub fn line_orientation_difference(a: f64, b: f64) -> f64 {
    let mut diff = (a - b).rem_euclid(PI); // [0, π)
    if diff > PI / 2.0 {
        diff -= PI;
    }
    diff
}

// =========================================================================
// == Pose Types ==
// =========================================================================

/// A hypothesized or estimated robot pose in the field frame.
///
/// `x` and `y` are in centimetres, `h` is the heading in radians,
/// counter-clockwise from the +x axis and always kept in (−π, π].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoseEstimate {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub h: f64,
}

impl PoseEstimate {
    /// Creates a pose, wrapping the heading.
    pub fn new(x: f64, y: f64, h: f64) -> Self {
        Self {
            x,
            y,
            h: normalize_angle(h),
        }
    }

    pub fn heading_deg(&self) -> f64 {
        self.h.to_degrees()
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn to_isometry(&self) -> Isometry2<f64> {
        Isometry2::new(self.position(), self.h)
    }

    pub fn from_isometry(iso: &Isometry2<f64>) -> Self {
        Self::new(
            iso.translation.vector.x,
            iso.translation.vector.y,
            iso.rotation.angle(),
        )
    }

    /// Euclidean distance between the positions of two poses.
    pub fn distance_to(&self, other: &PoseEstimate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The uncertainty attached to a `PoseEstimate`: one standard deviation per
/// component (`h` in radians).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoseUncertainty {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub h: f64,
}

impl PoseUncertainty {
    pub fn new(x: f64, y: f64, h: f64) -> Self {
        Self { x, y, h }
    }

    pub fn h_deg(&self) -> f64 {
        self.h.to_degrees()
    }
}

// =========================================================================
// == Odometry ==
// =========================================================================

/// Robot-relative odometry change since the previous control cycle.
///
/// Sign convention: `forward` is positive ahead of the robot, `lateral` is
/// positive to the robot's left, `rotational` is positive counter-clockwise.
/// Lengths in centimetres, rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotionDelta {
    pub forward: f64,
    pub lateral: f64,
    pub rotational: f64,
}

impl MotionDelta {
    pub const ZERO: MotionDelta = MotionDelta {
        forward: 0.0,
        lateral: 0.0,
        rotational: 0.0,
    };

    pub fn new(forward: f64, lateral: f64, rotational: f64) -> Self {
        Self {
            forward,
            lateral,
            rotational,
        }
    }

    /// Magnitude of the translational part.
    pub fn translation(&self) -> f64 {
        self.forward.hypot(self.lateral)
    }

    pub fn is_zero(&self) -> bool {
        self.forward == 0.0 && self.lateral == 0.0 && self.rotational == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalize_angle_stays_in_half_open_interval() {
        assert_abs_diff_eq!(normalize_angle(PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(-PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(2.5 * PI), 0.5 * PI, epsilon = 1e-9);
        assert_abs_diff_eq!(normalize_angle(-0.5), -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_angle(TAU + 0.25), 0.25, epsilon = 1e-12);
        for i in -50..50 {
            let wrapped = normalize_angle(i as f64 * 0.7);
            assert!(wrapped > -PI && wrapped <= PI, "{wrapped}");
        }
    }

    #[test]
    fn angle_difference_takes_short_way_round() {
        let a = 179f64.to_radians();
        let b = -179f64.to_radians();
        assert_abs_diff_eq!(angle_difference(a, b), -2f64.to_radians(), epsilon = 1e-12);
        assert_abs_diff_eq!(angle_difference(b, a), 2f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn line_orientation_is_directionless() {
        assert_abs_diff_eq!(line_orientation_difference(0.1, 0.1 + PI), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(line_orientation_difference(0.3, 0.1), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(
            line_orientation_difference(0.0, PI / 2.0 + 0.1),
            PI / 2.0 - 0.1,
            epsilon = 1e-12
        );
    }

    #[test]
    fn pose_isometry_conversion_preserves_heading() {
        let pose = PoseEstimate::new(120.0, -40.0, 2.5);
        let back = PoseEstimate::from_isometry(&pose.to_isometry());
        assert_abs_diff_eq!(back.x, pose.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, pose.y, epsilon = 1e-9);
        assert_abs_diff_eq!(back.h, pose.h, epsilon = 1e-9);
        assert_abs_diff_eq!(PoseEstimate::new(0.0, 0.0, 1.0).heading_deg(), 1f64.to_degrees());
    }
}
