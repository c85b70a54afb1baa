// mcl_sim/src/simulation/world/robot.rs

use log::debug;
use mcl_core::mapping::FieldBounds;
use mcl_core::models::motion::OdometryMotionModel;
use mcl_core::types::{MotionDelta, PoseEstimate};

use crate::simulation::config::structs::{CommandSegment, RobotConfig};

/// Clearance (cm) kept between the robot and the outer field bounds.
const BOUNDARY_MARGIN: f64 = 40.0;
/// Turn applied instead of a command that would leave the field.
const AVOIDANCE_TURN: f64 = 0.3;

/// The simulated robot's true pose and its command schedule.
#[derive(Debug, Clone)]
pub struct GroundTruthRobot {
    pose: PoseEstimate,
    commands: Vec<CommandSegment>,
    segment: usize,
    cycles_in_segment: usize,
    bounds: FieldBounds,
}

impl GroundTruthRobot {
    pub fn new(config: &RobotConfig, bounds: FieldBounds) -> Self {
        Self {
            pose: PoseEstimate::new(config.start_pose.x, config.start_pose.y, config.start_pose.h),
            commands: config.command.iter().copied().filter(|c| c.cycles > 0).collect(),
            segment: 0,
            cycles_in_segment: 0,
            bounds,
        }
    }

    pub fn pose(&self) -> PoseEstimate {
        self.pose
    }

    /// The command for the current cycle, advancing (and looping) the schedule.
    fn next_command(&mut self) -> MotionDelta {
        let Some(current) = self.commands.get(self.segment).copied() else {
            return MotionDelta::ZERO;
        };
        self.cycles_in_segment += 1;
        if self.cycles_in_segment >= current.cycles {
            self.cycles_in_segment = 0;
            self.segment = (self.segment + 1) % self.commands.len();
        }
        current.delta()
    }

    /// Executes one cycle and returns the motion that actually happened.
    ///
    /// A command that would carry the robot out of the field is replaced by an
    /// on-the-spot turn.
    pub fn step(&mut self) -> MotionDelta {
        let mut executed = self.next_command();
        let next = OdometryMotionModel::apply(&self.pose, &executed);
        if !self.inside(&next) {
            debug!(
                "Robot at ({:.0}, {:.0}) would leave the field; turning instead.",
                self.pose.x, self.pose.y
            );
            executed = MotionDelta::new(0.0, 0.0, AVOIDANCE_TURN);
        }
        self.pose = OdometryMotionModel::apply(&self.pose, &executed);
        executed
    }

    fn inside(&self, pose: &PoseEstimate) -> bool {
        pose.x.abs() <= self.bounds.half_length - BOUNDARY_MARGIN
            && pose.y.abs() <= self.bounds.half_width - BOUNDARY_MARGIN
    }
}
