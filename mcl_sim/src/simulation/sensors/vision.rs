// mcl_sim/src/simulation/sensors/vision.rs

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;
use mcl_core::mapping::{FieldLandmarkMap, LandmarkId, LineLandmark};
use mcl_core::messages::{LandmarkAssociation, LandmarkObservation, LineSighting, PointSighting};
use mcl_core::models::measurement::{line, point};
use mcl_core::models::sample_gaussian;
use mcl_core::types::{normalize_angle, PoseEstimate};
use nalgebra::Point2;
use rand::Rng;

use crate::simulation::config::structs::{IdentityMode, VisionConfig};

/// Two landmark positions closer than this (cm) are considered the same.
const SYMMETRY_TOLERANCE: f64 = 1.0;
/// Phantom detections are never closer than this (cm).
const MIN_PHANTOM_DISTANCE: f64 = 30.0;

/// Simulated landmark detector with a limited range and field of view.
pub struct VisionSensor {
    config: VisionConfig,
    map: Arc<FieldLandmarkMap>,
    /// For each landmark, every landmark it is indistinguishable from under
    /// the field's mirror symmetries (itself included).
    lookalikes: HashMap<LandmarkId, Vec<LandmarkId>>,
}

impl VisionSensor {
    pub fn new(config: VisionConfig, map: Arc<FieldLandmarkMap>) -> Self {
        let lookalikes = symmetric_lookalikes(&map);
        Self {
            config,
            map,
            lookalikes,
        }
    }

    /// Everything the camera reports for one frame taken at `truth`.
    pub fn observe<R: Rng + ?Sized>(&self, truth: &PoseEstimate, rng: &mut R) -> Vec<LandmarkObservation> {
        let mut observations = Vec::new();

        for landmark in self.map.points() {
            let expected = point::expected(truth, landmark);
            if !self.visible(expected.distance, expected.bearing) {
                continue;
            }
            let distance_sd = self.distance_sd(expected.distance);
            observations.push(LandmarkObservation::Point(PointSighting {
                distance: (expected.distance + sample_gaussian(rng, distance_sd)).max(0.0),
                bearing: normalize_angle(expected.bearing + sample_gaussian(rng, self.config.bearing_sd)),
                association: self.association(landmark.id),
                distance_sd: self.reported(distance_sd),
                bearing_sd: self.reported(self.config.bearing_sd),
            }));
        }

        if self.config.lines {
            for landmark in self.map.lines() {
                let expected = line::expected(truth, landmark);
                if !self.visible(expected.distance, expected.bearing) {
                    continue;
                }
                let distance_sd = self.distance_sd(expected.distance);
                observations.push(LandmarkObservation::Line(LineSighting {
                    distance: (expected.distance + sample_gaussian(rng, distance_sd)).max(0.0),
                    bearing: normalize_angle(expected.bearing + sample_gaussian(rng, self.config.bearing_sd)),
                    orientation: normalize_angle(
                        expected.orientation + sample_gaussian(rng, self.config.orientation_sd),
                    ),
                    association: self.association(landmark.id),
                    distance_sd: self.reported(distance_sd),
                    bearing_sd: self.reported(self.config.bearing_sd),
                }));
            }
        }

        if self.config.spurious_rate > 0.0 && rng.gen_bool(self.config.spurious_rate) {
            let phantom = self.phantom(rng);
            trace!("Injecting phantom detection {:?}", phantom);
            observations.push(phantom);
        }

        observations
    }

    fn half_fov(&self) -> f64 {
        self.config.field_of_view_deg.to_radians() / 2.0
    }

    fn visible(&self, distance: f64, bearing: f64) -> bool {
        distance <= self.config.max_distance && bearing.abs() <= self.half_fov()
    }

    fn distance_sd(&self, distance: f64) -> f64 {
        self.config.distance_sd + self.config.distance_sd_per_cm * distance
    }

    fn reported(&self, sd: f64) -> Option<f64> {
        (self.config.report_deviations && sd > 0.0).then_some(sd)
    }

    fn association(&self, id: LandmarkId) -> LandmarkAssociation {
        match self.config.identity {
            IdentityMode::Known => LandmarkAssociation::Known(id),
            IdentityMode::Candidates => LandmarkAssociation::Candidates(
                self.lookalikes.get(&id).cloned().unwrap_or_else(|| vec![id]),
            ),
            IdentityMode::Unknown => LandmarkAssociation::Unknown,
        }
    }

    /// A point detection at a random range and bearing inside the view cone.
    fn phantom<R: Rng + ?Sized>(&self, rng: &mut R) -> LandmarkObservation {
        let far = self.config.max_distance.max(MIN_PHANTOM_DISTANCE);
        let half_fov = self.half_fov().min(std::f64::consts::PI);
        LandmarkObservation::ambiguous_point(
            Vec::new(),
            rng.gen_range(MIN_PHANTOM_DISTANCE..=far),
            rng.gen_range(-half_fov..=half_fov),
        )
    }
}

/// The four images of a position under the field's mirror symmetries.
fn mirror_images(p: &Point2<f64>) -> [Point2<f64>; 4] {
    [
        Point2::new(p.x, p.y),
        Point2::new(-p.x, p.y),
        Point2::new(p.x, -p.y),
        Point2::new(-p.x, -p.y),
    ]
}

fn same_position(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    (a.coords - b.coords).norm() < SYMMETRY_TOLERANCE
}

fn same_segment(a: &LineLandmark, start: &Point2<f64>, end: &Point2<f64>) -> bool {
    (same_position(&a.start, start) && same_position(&a.end, end))
        || (same_position(&a.start, end) && same_position(&a.end, start))
}

fn symmetric_lookalikes(map: &FieldLandmarkMap) -> HashMap<LandmarkId, Vec<LandmarkId>> {
    let mut lookalikes = HashMap::new();

    for landmark in map.points() {
        let images = mirror_images(&landmark.position);
        let mut ids: Vec<LandmarkId> = map
            .points()
            .iter()
            .filter(|other| images.iter().any(|image| same_position(&other.position, image)))
            .map(|other| other.id)
            .collect();
        ids.sort();
        lookalikes.insert(landmark.id, ids);
    }

    for landmark in map.lines() {
        let starts = mirror_images(&landmark.start);
        let ends = mirror_images(&landmark.end);
        let mut ids: Vec<LandmarkId> = map
            .lines()
            .iter()
            .filter(|other| (0..4).any(|k| same_segment(other, &starts[k], &ends[k])))
            .map(|other| other.id)
            .collect();
        ids.sort();
        lookalikes.insert(landmark.id, ids);
    }

    lookalikes
}
