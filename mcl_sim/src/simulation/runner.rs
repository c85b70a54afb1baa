// mcl_sim/src/simulation/runner.rs

//! One scenario, start to finish: ground truth → sensors → estimator → score.

use std::sync::Arc;

use log::{debug, info};
use mcl_core::estimation::filters::MonteCarloLocalization;
use mcl_core::estimation::PoseEstimator;
use mcl_core::mapping::{standard_field, FieldLandmarkMap};
use mcl_core::types::{MotionDelta, PoseEstimate, PoseUncertainty};
use rand_chacha::ChaCha8Rng;

use crate::error::SimError;
use crate::simulation::config::structs::ScenarioConfig;
use crate::simulation::core::prng::{SimulationRng, FILTER_STREAM};
use crate::simulation::debugging::state_error::{ErrorAccumulator, ScenarioReport, StateError};
use crate::simulation::sensors::odometry::OdometrySensor;
use crate::simulation::sensors::vision::VisionSensor;
use crate::simulation::world::robot::GroundTruthRobot;

/// What happened in one control cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleRecord {
    pub cycle: usize,
    pub truth: PoseEstimate,
    pub odometry: MotionDelta,
    pub observations: usize,
    pub estimate: PoseEstimate,
    pub uncertainty: PoseUncertainty,
    pub error: StateError,
}

/// Drives one estimator through one scenario.
pub struct ScenarioRunner {
    name: String,
    seed: u64,
    cycles: usize,
    vision_period: usize,
    robot: GroundTruthRobot,
    odometry: OdometrySensor,
    vision: VisionSensor,
    estimator: Box<dyn PoseEstimator>,
    rng: SimulationRng,
    errors: ErrorAccumulator,
    cycle: usize,
}

impl ScenarioRunner {
    /// Builds the world, sensors and a Monte Carlo estimator on the standard
    /// field.
    pub fn new(name: &str, config: ScenarioConfig) -> Result<Self, SimError> {
        let map = Arc::new(standard_field());
        let (rng, seed) = SimulationRng::new(config.simulation.seed);

        let filter: MonteCarloLocalization<ChaCha8Rng> = MonteCarloLocalization::new(
            config.filter.clone(),
            map.clone(),
            SimulationRng::stream(seed, FILTER_STREAM),
        )
        .map_err(|source| SimError::InvalidFilter {
            name: name.to_string(),
            source,
        })?;

        Ok(Self::with_estimator(name, config, map, Box::new(filter), rng, seed))
    }

    /// Same as [`new`](Self::new) with any estimator behind the trait.
    pub fn with_estimator(
        name: &str,
        config: ScenarioConfig,
        map: Arc<FieldLandmarkMap>,
        estimator: Box<dyn PoseEstimator>,
        rng: SimulationRng,
        seed: u64,
    ) -> Self {
        info!(
            "Scenario '{}': {} cycles, vision every {} cycle(s), identity {:?}, seed {}",
            name,
            config.simulation.cycles,
            config.simulation.vision_period,
            config.vision.identity,
            seed
        );
        Self {
            name: name.to_string(),
            seed,
            cycles: config.simulation.cycles,
            vision_period: config.simulation.vision_period.max(1),
            robot: GroundTruthRobot::new(&config.robot, map.bounds()),
            odometry: OdometrySensor::new(config.odometry),
            vision: VisionSensor::new(config.vision, map),
            estimator,
            rng,
            errors: ErrorAccumulator::default(),
            cycle: 0,
        }
    }

    /// Advances the world by one control cycle and updates the estimator.
    pub fn step(&mut self) -> CycleRecord {
        self.cycle += 1;

        let executed = self.robot.step();
        let truth = self.robot.pose();
        let odometry = self.odometry.measure(&executed, &mut self.rng.0);

        let observations = if self.cycle % self.vision_period == 0 {
            self.vision.observe(&truth, &mut self.rng.0)
        } else {
            Vec::new()
        };

        self.estimator.update_localization(odometry, &observations);

        let estimate = self.estimator.estimate();
        let uncertainty = self.estimator.uncertainty();
        let error = StateError::between(&truth, &estimate);
        self.errors.record(error, &uncertainty);

        debug!(
            "Cycle {} State Error | Pos Err: {:.1}cm | Heading Err: {:.1}°",
            self.cycle,
            error.position,
            error.heading.to_degrees()
        );

        CycleRecord {
            cycle: self.cycle,
            truth,
            odometry,
            observations: observations.len(),
            estimate,
            uncertainty,
            error,
        }
    }

    /// Runs every configured cycle, handing each record to `on_cycle`.
    pub fn run<F: FnMut(&CycleRecord)>(mut self, mut on_cycle: F) -> ScenarioReport {
        while self.cycle < self.cycles {
            let record = self.step();
            on_cycle(&record);
        }
        let report = self.report();
        info!(
            "Scenario '{}' done | RMS Pos Err: {:.1}cm | RMS Heading Err: {:.1}°",
            report.name, report.rms_position_error, report.rms_heading_error_deg
        );
        report
    }

    pub fn report(&self) -> ScenarioReport {
        self.errors.report(&self.name, self.seed)
    }

    pub fn estimator(&self) -> &dyn PoseEstimator {
        self.estimator.as_ref()
    }

    pub fn truth(&self) -> PoseEstimate {
        self.robot.pose()
    }
}
