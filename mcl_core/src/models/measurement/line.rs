// mcl_core/src/models/measurement/line.rs

use nalgebra::Point2;

use crate::config::LineLikelihood;
use crate::mapping::LineLandmark;
use crate::messages::LineSighting;
use crate::models::measurement::reported_or;
use crate::types::{angle_difference, line_orientation_difference, normalize_angle, PoseEstimate};

/// What a robot at some pose should measure to a field line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedLine {
    /// Distance to the closest point of the segment.
    pub distance: f64,
    /// Bearing to that closest point.
    pub bearing: f64,
    /// Line direction relative to the heading, meaningful modulo π.
    pub orientation: f64,
}

pub fn expected(pose: &PoseEstimate, line: &LineLandmark) -> ExpectedLine {
    let closest = line.closest_point(&Point2::new(pose.x, pose.y));
    let relative = pose.to_isometry().inverse_transform_point(&closest);
    ExpectedLine {
        distance: relative.coords.norm(),
        bearing: relative.y.atan2(relative.x),
        orientation: normalize_angle(line.orientation() - pose.h),
    }
}

/// Squared normalised range + bearing + orientation error. The orientation
/// term ignores the line's direction so a line seen from either end is not
/// penalised by 180°.
pub fn discrepancy(sighting: &LineSighting, expected: &ExpectedLine, params: &LineLikelihood) -> f64 {
    let distance_sd = reported_or(
        sighting.distance_sd,
        params.distance_sd_base + params.distance_sd_per_cm * sighting.distance.abs(),
    );
    let bearing_sd = reported_or(sighting.bearing_sd, params.bearing_sd);

    let dr = (sighting.distance - expected.distance) / distance_sd;
    let db = angle_difference(sighting.bearing, expected.bearing) / bearing_sd;
    let dor = line_orientation_difference(sighting.orientation, expected.orientation)
        / params.orientation_sd;
    dr * dr + db * db + dor * dor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::LandmarkId;
    use crate::messages::LandmarkAssociation;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn midline() -> LineLandmark {
        LineLandmark {
            id: LandmarkId(30),
            name: "midline".into(),
            start: Point2::new(0.0, -200.0),
            end: Point2::new(0.0, 200.0),
        }
    }

    #[test]
    fn expected_line_geometry() {
        let pose = PoseEstimate::new(-100.0, 50.0, 0.0);
        let e = expected(&pose, &midline());
        assert_abs_diff_eq!(e.distance, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(e.bearing, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(e.orientation, FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn line_seen_from_either_end_matches() {
        let pose = PoseEstimate::new(-100.0, 0.0, 0.0);
        let e = expected(&pose, &midline());
        let params = LineLikelihood::default();

        let along = LineSighting {
            distance: 100.0,
            bearing: 0.0,
            orientation: FRAC_PI_2,
            association: LandmarkAssociation::Unknown,
            distance_sd: None,
            bearing_sd: None,
        };
        let reversed = LineSighting {
            orientation: FRAC_PI_2 - PI,
            ..along.clone()
        };
        assert_abs_diff_eq!(discrepancy(&along, &e, &params), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(discrepancy(&reversed, &e, &params), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn orientation_error_is_penalised() {
        let pose = PoseEstimate::new(-100.0, 0.0, 0.0);
        let e = expected(&pose, &midline());
        let params = LineLikelihood::default();
        let skewed = LineSighting {
            distance: 100.0,
            bearing: 0.0,
            orientation: FRAC_PI_2 + 0.4,
            association: LandmarkAssociation::Unknown,
            distance_sd: None,
            bearing_sd: None,
        };
        assert_abs_diff_eq!(discrepancy(&skewed, &e, &params), 4.0, epsilon = 1e-9);
    }
}
