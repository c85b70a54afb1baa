// mcl_sim/src/simulation/sensors/odometry.rs

use mcl_core::config::MotionNoise;
use mcl_core::models::motion::OdometryMotionModel;
use mcl_core::types::MotionDelta;
use rand::Rng;

/// Simulated odometry: reports the executed motion with proportional noise,
/// using the same noise law the filter assumes.
#[derive(Debug, Clone, Copy)]
pub struct OdometrySensor {
    model: OdometryMotionModel,
}

impl OdometrySensor {
    pub fn new(noise: MotionNoise) -> Self {
        Self {
            model: OdometryMotionModel::new(noise),
        }
    }

    pub fn measure<R: Rng + ?Sized>(&self, executed: &MotionDelta, rng: &mut R) -> MotionDelta {
        if executed.is_zero() {
            return MotionDelta::ZERO;
        }
        self.model.sample_delta(executed, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::core::prng::SimulationRng;

    #[test]
    fn noiseless_odometry_is_exact() {
        let sensor = OdometrySensor::new(MotionNoise::NONE);
        let mut rng = SimulationRng::stream(1, 0);
        let delta = MotionDelta::new(8.0, -1.0, 0.05);
        assert_eq!(sensor.measure(&delta, &mut rng), delta);
    }

    #[test]
    fn noisy_odometry_differs_from_truth() {
        let sensor = OdometrySensor::new(MotionNoise::default());
        let mut rng = SimulationRng::stream(1, 0);
        let delta = MotionDelta::new(8.0, 0.0, 0.0);
        assert_ne!(sensor.measure(&delta, &mut rng), delta);
        assert_eq!(sensor.measure(&MotionDelta::ZERO, &mut rng), MotionDelta::ZERO);
    }
}
