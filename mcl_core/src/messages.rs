// mcl_core/src/messages.rs

use serde::{Deserialize, Serialize};

use crate::mapping::LandmarkId;

// =========================================================================
// == Observation Data Structures ==
// =========================================================================

/// Which map landmark an observation refers to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LandmarkAssociation {
    /// Vision identified the landmark uniquely.
    Known(LandmarkId),
    /// Vision narrowed it down to a set of possibilities. Each particle picks
    /// the candidate that best matches its own pose hypothesis.
    Candidates(Vec<LandmarkId>),
    /// No identity information; any landmark of the same kind may match.
    #[default]
    Unknown,
}

/// A point landmark seen by the robot, in the robot's egocentric frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSighting {
    /// Distance to the landmark in cm.
    pub distance: f64,
    /// Bearing to the landmark in radians, counter-clockwise from straight ahead.
    pub bearing: f64,
    #[serde(default)]
    pub association: LandmarkAssociation,
    /// Vision-reported distance deviation; replaces the configured default.
    #[serde(default)]
    pub distance_sd: Option<f64>,
    /// Vision-reported bearing deviation; replaces the configured default.
    #[serde(default)]
    pub bearing_sd: Option<f64>,
}

/// A field line seen by the robot.
///
/// `distance` and `bearing` locate the closest visible point of the line;
/// `orientation` is the line's direction relative to the robot heading and is
/// only meaningful modulo π.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSighting {
    pub distance: f64,
    pub bearing: f64,
    pub orientation: f64,
    #[serde(default)]
    pub association: LandmarkAssociation,
    #[serde(default)]
    pub distance_sd: Option<f64>,
    #[serde(default)]
    pub bearing_sd: Option<f64>,
}

/// A single landmark detection from one vision frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LandmarkObservation {
    Point(PointSighting),
    Line(LineSighting),
}

impl LandmarkObservation {
    /// An identified point landmark with default deviations.
    pub fn known_point(id: LandmarkId, distance: f64, bearing: f64) -> Self {
        LandmarkObservation::Point(PointSighting {
            distance,
            bearing,
            association: LandmarkAssociation::Known(id),
            distance_sd: None,
            bearing_sd: None,
        })
    }

    /// A point landmark whose identity must be resolved during matching.
    pub fn ambiguous_point(candidates: Vec<LandmarkId>, distance: f64, bearing: f64) -> Self {
        let association = if candidates.is_empty() {
            LandmarkAssociation::Unknown
        } else {
            LandmarkAssociation::Candidates(candidates)
        };
        LandmarkObservation::Point(PointSighting {
            distance,
            bearing,
            association,
            distance_sd: None,
            bearing_sd: None,
        })
    }

    pub fn line(association: LandmarkAssociation, distance: f64, bearing: f64, orientation: f64) -> Self {
        LandmarkObservation::Line(LineSighting {
            distance,
            bearing,
            orientation,
            association,
            distance_sd: None,
            bearing_sd: None,
        })
    }

    pub fn association(&self) -> &LandmarkAssociation {
        match self {
            LandmarkObservation::Point(p) => &p.association,
            LandmarkObservation::Line(l) => &l.association,
        }
    }

    pub fn distance(&self) -> f64 {
        match self {
            LandmarkObservation::Point(p) => p.distance,
            LandmarkObservation::Line(l) => l.distance,
        }
    }
}
