// mcl_core/src/models/measurement/mod.rs

//! The landmark measurement model: how well one pose hypothesis explains a
//! batch of landmark observations.
//!
//! Per observation the model computes the geometry the robot *would* measure
//! from the hypothesised pose, compares it with what was measured, and turns
//! the normalised discrepancy into a Gaussian similarity in (floor, 1].
//! Similarities are combined as a sum of logs so that many observations do not
//! underflow.

use crate::config::{LineLikelihood, PointLikelihood};
use crate::mapping::FieldLandmarkMap;
use crate::messages::LandmarkObservation;
use crate::types::PoseEstimate;

pub mod correspondence;
pub mod line;
pub mod point;

pub use correspondence::{Correspondence, Landmark};
pub use line::ExpectedLine;
pub use point::ExpectedPoint;

/// Gaussian-decay likelihood over point and line sightings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkMeasurementModel {
    pub point: PointLikelihood,
    pub line: LineLikelihood,
    pub similarity_floor: f64,
}

impl LandmarkMeasurementModel {
    pub fn new(point: PointLikelihood, line: LineLikelihood, similarity_floor: f64) -> Self {
        Self {
            point,
            line,
            similarity_floor,
        }
    }

    /// Finds the landmark this observation most plausibly refers to, as seen
    /// from `pose`. `None` when the association names nothing in the map.
    pub fn correspond(
        &self,
        pose: &PoseEstimate,
        observation: &LandmarkObservation,
        map: &FieldLandmarkMap,
    ) -> Option<Correspondence> {
        match observation {
            LandmarkObservation::Point(sighting) => correspondence::best_match(
                &sighting.association,
                |id| map.point(id),
                map.points(),
                |landmark| point::discrepancy(sighting, &point::expected(pose, landmark), &self.point),
            ),
            LandmarkObservation::Line(sighting) => correspondence::best_match(
                &sighting.association,
                |id| map.line(id),
                map.lines(),
                |landmark| line::discrepancy(sighting, &line::expected(pose, landmark), &self.line),
            ),
        }
    }

    /// Similarity of one observation with one pose, in `[similarity_floor, 1]`.
    pub fn similarity(
        &self,
        pose: &PoseEstimate,
        observation: &LandmarkObservation,
        map: &FieldLandmarkMap,
    ) -> f64 {
        match self.correspond(pose, observation, map) {
            Some(c) => (-0.5 * c.discrepancy).exp().max(self.similarity_floor),
            None => self.similarity_floor,
        }
    }

    /// Log of the product of similarities over all observations. Zero for an
    /// empty batch.
    pub fn log_likelihood(
        &self,
        pose: &PoseEstimate,
        observations: &[LandmarkObservation],
        map: &FieldLandmarkMap,
    ) -> f64 {
        observations
            .iter()
            .map(|z| self.similarity(pose, z, map).ln())
            .sum()
    }
}

/// Picks the observation's own deviation when it reported a usable one.
pub(crate) fn reported_or(reported: Option<f64>, default: f64) -> f64 {
    reported.filter(|sd| sd.is_finite() && *sd > 0.0).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{standard_field, LandmarkId};
    use crate::messages::LandmarkAssociation;
    use approx::assert_abs_diff_eq;

    fn model() -> LandmarkMeasurementModel {
        LandmarkMeasurementModel::new(PointLikelihood::default(), LineLikelihood::default(), 1e-3)
    }

    fn sighting_from(pose: &PoseEstimate, map: &FieldLandmarkMap, name: &str) -> (LandmarkId, f64, f64) {
        let landmark = map.point_by_name(name).unwrap();
        let expected = point::expected(pose, landmark);
        (landmark.id, expected.distance, expected.bearing)
    }

    #[test]
    fn perfect_observation_has_unit_similarity() {
        let map = standard_field();
        let pose = PoseEstimate::new(100.0, 50.0, 0.3);
        let (id, d, b) = sighting_from(&pose, &map, "yellow_goal_left_post");
        let z = LandmarkObservation::known_point(id, d, b);
        assert_abs_diff_eq!(model().similarity(&pose, &z, &map), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn worse_match_scores_lower() {
        let map = standard_field();
        let truth = PoseEstimate::new(0.0, 0.0, 0.0);
        let (id, d, b) = sighting_from(&truth, &map, "yellow_goal_left_post");
        let z = LandmarkObservation::known_point(id, d, b);

        let m = model();
        let near = m.similarity(&PoseEstimate::new(10.0, 0.0, 0.0), &z, &map);
        let far = m.similarity(&PoseEstimate::new(60.0, 0.0, 0.0), &z, &map);
        assert!(near > far, "near {near} far {far}");
        assert!(m.similarity(&truth, &z, &map) > near);
    }

    #[test]
    fn implausible_observation_is_floored() {
        let map = standard_field();
        let pose = PoseEstimate::new(0.0, 0.0, 0.0);
        let id = map.point_by_name("yellow_goal_left_post").unwrap().id;
        // Claims the post is right behind us, 5 m away.
        let z = LandmarkObservation::known_point(id, 500.0, std::f64::consts::PI);
        assert_abs_diff_eq!(model().similarity(&pose, &z, &map), 1e-3);
    }

    #[test]
    fn unknown_landmark_id_contributes_the_floor() {
        let map = standard_field();
        let pose = PoseEstimate::new(0.0, 0.0, 0.0);
        let z = LandmarkObservation::known_point(LandmarkId(9_999), 100.0, 0.0);
        assert_abs_diff_eq!(model().similarity(&pose, &z, &map), 1e-3);
    }

    #[test]
    fn log_likelihood_of_empty_batch_is_zero() {
        let map = standard_field();
        let pose = PoseEstimate::new(0.0, 0.0, 0.0);
        assert_eq!(model().log_likelihood(&pose, &[], &map), 0.0);
    }

    #[test]
    fn reported_deviation_replaces_default() {
        let map = standard_field();
        let truth = PoseEstimate::new(0.0, 0.0, 0.0);
        let (id, d, b) = sighting_from(&truth, &map, "yellow_goal_right_post");
        let hypothesis = PoseEstimate::new(30.0, 0.0, 0.0);

        let default_sd = LandmarkObservation::known_point(id, d, b);
        let confident = LandmarkObservation::Point(crate::messages::PointSighting {
            distance: d,
            bearing: b,
            association: LandmarkAssociation::Known(id),
            distance_sd: Some(2.0),
            bearing_sd: Some(0.01),
        });
        let m = model();
        assert!(m.similarity(&hypothesis, &confident, &map) < m.similarity(&hypothesis, &default_sd, &map));
    }
}
