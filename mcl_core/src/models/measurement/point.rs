// mcl_core/src/models/measurement/point.rs

use crate::config::PointLikelihood;
use crate::mapping::PointLandmark;
use crate::messages::PointSighting;
use crate::models::measurement::reported_or;
use crate::types::{angle_difference, PoseEstimate};

/// What a robot at some pose should measure to a point landmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedPoint {
    pub distance: f64,
    pub bearing: f64,
}

/// Range and bearing from `pose` to `landmark`.
pub fn expected(pose: &PoseEstimate, landmark: &PointLandmark) -> ExpectedPoint {
    let relative = pose.to_isometry().inverse_transform_point(&landmark.position);
    ExpectedPoint {
        distance: relative.coords.norm(),
        bearing: relative.y.atan2(relative.x),
    }
}

/// Squared normalised range + bearing error.
pub fn discrepancy(
    sighting: &PointSighting,
    expected: &ExpectedPoint,
    params: &PointLikelihood,
) -> f64 {
    let distance_sd = reported_or(
        sighting.distance_sd,
        params.distance_sd_base + params.distance_sd_per_cm * sighting.distance.abs(),
    );
    let bearing_sd = reported_or(sighting.bearing_sd, params.bearing_sd);

    let dr = (sighting.distance - expected.distance) / distance_sd;
    let db = angle_difference(sighting.bearing, expected.bearing) / bearing_sd;
    dr * dr + db * db
}
