// mcl_core/src/mapping/field_layout.rs
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::mapping::{FieldBounds, FieldLandmarkMap, LandmarkId, LineLandmark, PointLandmark};

/// The measurements needed to lay out a rectangular soccer field.
/// All values in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldDimensions {
    /// Goal line to goal line.
    pub length: f64,
    /// Sideline to sideline.
    pub width: f64,
    /// Carpet margin outside the lines that a robot may still stand on.
    pub border: f64,
    /// Distance between the two posts of one goal.
    pub goal_width: f64,
    /// Depth of the goal box, measured from the goal line.
    pub goal_box_depth: f64,
    /// Width of the goal box along the goal line.
    pub goal_box_width: f64,
    pub center_circle_radius: f64,
    /// Penalty mark distance from the goal line.
    pub penalty_mark_distance: f64,
}

/// The default field, the 6 m x 4 m layout.
pub const STANDARD_FIELD: FieldDimensions = FieldDimensions {
    length: 600.0,
    width: 400.0,
    border: 70.0,
    goal_width: 140.0,
    goal_box_depth: 60.0,
    goal_box_width: 220.0,
    center_circle_radius: 60.0,
    penalty_mark_distance: 180.0,
};

impl FieldDimensions {
    /// Builds the landmark table for these dimensions.
    ///
    /// The blue goal sits on the −x end line and the yellow goal on the +x end
    /// line; "left" means +y in the field frame.
    pub fn landmark_map(&self) -> FieldLandmarkMap {
        let hl = self.length / 2.0;
        let hw = self.width / 2.0;
        let gw = self.goal_width / 2.0;
        let bw = self.goal_box_width / 2.0;
        let box_x = hl - self.goal_box_depth;
        let mark_x = hl - self.penalty_mark_distance;

        let point_specs: [(&str, f64, f64); 22] = [
            // --- Goal posts ---
            ("blue_goal_left_post", -hl, gw),
            ("blue_goal_right_post", -hl, -gw),
            ("yellow_goal_left_post", hl, gw),
            ("yellow_goal_right_post", hl, -gw),
            // --- Field corners (L junctions) ---
            ("blue_left_corner", -hl, hw),
            ("blue_right_corner", -hl, -hw),
            ("yellow_left_corner", hl, hw),
            ("yellow_right_corner", hl, -hw),
            // --- Goal box corners (L junctions) ---
            ("blue_box_left_corner", -box_x, bw),
            ("blue_box_right_corner", -box_x, -bw),
            ("yellow_box_left_corner", box_x, bw),
            ("yellow_box_right_corner", box_x, -bw),
            // --- Goal box T junctions on the end lines ---
            ("blue_box_left_t", -hl, bw),
            ("blue_box_right_t", -hl, -bw),
            ("yellow_box_left_t", hl, bw),
            ("yellow_box_right_t", hl, -bw),
            // --- Midline ---
            ("center_left_t", 0.0, hw),
            ("center_right_t", 0.0, -hw),
            ("center_circle_left", 0.0, self.center_circle_radius),
            ("center_circle_right", 0.0, -self.center_circle_radius),
            // --- Marks ---
            ("blue_penalty_mark", -mark_x, 0.0),
            ("yellow_penalty_mark", mark_x, 0.0),
        ];

        let line_specs: [(&str, (f64, f64), (f64, f64)); 11] = [
            ("left_sideline", (-hl, hw), (hl, hw)),
            ("right_sideline", (-hl, -hw), (hl, -hw)),
            ("blue_end_line", (-hl, -hw), (-hl, hw)),
            ("yellow_end_line", (hl, -hw), (hl, hw)),
            ("midline", (0.0, -hw), (0.0, hw)),
            ("blue_box_front", (-box_x, -bw), (-box_x, bw)),
            ("yellow_box_front", (box_x, -bw), (box_x, bw)),
            ("blue_box_left", (-hl, bw), (-box_x, bw)),
            ("blue_box_right", (-hl, -bw), (-box_x, -bw)),
            ("yellow_box_left", (box_x, bw), (hl, bw)),
            ("yellow_box_right", (box_x, -bw), (hl, -bw)),
        ];

        let points = point_specs
            .iter()
            .enumerate()
            .map(|(i, (name, x, y))| PointLandmark {
                id: LandmarkId(i as u32),
                name: (*name).to_string(),
                position: Point2::new(*x, *y),
            })
            .collect();

        // Line ids continue after the points so every id in the map is unique.
        let lines = line_specs
            .iter()
            .enumerate()
            .map(|(i, (name, start, end))| LineLandmark {
                id: LandmarkId((point_specs.len() + i) as u32),
                name: (*name).to_string(),
                start: Point2::new(start.0, start.1),
                end: Point2::new(end.0, end.1),
            })
            .collect();

        FieldLandmarkMap {
            bounds: FieldBounds {
                half_length: hl + self.border,
                half_width: hw + self.border,
            },
            points,
            lines,
        }
    }
}

/// Returns the landmark map of the `STANDARD_FIELD`.
pub fn standard_field() -> FieldLandmarkMap {
    STANDARD_FIELD.landmark_map()
}
