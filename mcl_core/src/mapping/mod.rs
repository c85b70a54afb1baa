// mcl_core/src/mapping/mod.rs

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// --- Map Data Structures ---

/// A unique identifier for a landmark within one `FieldLandmarkMap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LandmarkId(pub u32);

/// A fixed point feature of the field (goal post, line junction, mark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLandmark {
    pub id: LandmarkId,
    pub name: String,
    /// Position in the field frame, in centimetres.
    pub position: Point2<f64>,
}

/// A fixed straight line segment painted on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineLandmark {
    pub id: LandmarkId,
    pub name: String,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl LineLandmark {
    /// Direction of the line in the field frame. Lines have no direction,
    /// so only the value modulo π is meaningful.
    pub fn orientation(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    /// The point of the segment closest to `p`.
    pub fn closest_point(&self, p: &Point2<f64>) -> Point2<f64> {
        let d: Vector2<f64> = self.end - self.start;
        let len_sq = d.norm_squared();
        if len_sq <= f64::EPSILON {
            return self.start;
        }
        let t = ((p.coords - self.start.coords).dot(&d) / len_sq).clamp(0.0, 1.0);
        self.start + d * t
    }
}

/// Axis-aligned extent of the area a robot can stand on, centred on the
/// field origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldBounds {
    pub half_length: f64,
    pub half_width: f64,
}

/// The immutable table of known landmarks.
///
/// Built once at startup and shared read-only (usually behind an `Arc`) by
/// every estimator that localizes against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldLandmarkMap {
    bounds: FieldBounds,
    points: Vec<PointLandmark>,
    lines: Vec<LineLandmark>,
}

impl FieldLandmarkMap {
    pub fn new(
        bounds: FieldBounds,
        points: Vec<PointLandmark>,
        lines: Vec<LineLandmark>,
    ) -> Result<Self, ConfigError> {
        if points.is_empty() && lines.is_empty() {
            return Err(ConfigError::EmptyLandmarkMap);
        }
        Ok(Self {
            bounds,
            points,
            lines,
        })
    }

    pub fn bounds(&self) -> FieldBounds {
        self.bounds
    }

    pub fn points(&self) -> &[PointLandmark] {
        &self.points
    }

    pub fn lines(&self) -> &[LineLandmark] {
        &self.lines
    }

    pub fn point(&self, id: LandmarkId) -> Option<&PointLandmark> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn line(&self, id: LandmarkId) -> Option<&LineLandmark> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn point_by_name(&self, name: &str) -> Option<&PointLandmark> {
        self.points.iter().find(|p| p.name == name)
    }

    pub fn line_by_name(&self, name: &str) -> Option<&LineLandmark> {
        self.lines.iter().find(|l| l.name == name)
    }

    /// True when (x, y) lies inside the field bounds.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.abs() <= self.bounds.half_length && y.abs() <= self.bounds.half_width
    }
}

// --- Implementation sub-modules ---
mod field_layout;

pub use field_layout::{standard_field, FieldDimensions, STANDARD_FIELD};
