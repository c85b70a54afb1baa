// mcl_sim/src/simulation/debugging/state_error.rs

use std::fmt;

use mcl_core::types::{angle_difference, PoseEstimate, PoseUncertainty};

// =========================================================================
// == Per-Cycle Error ==
// =========================================================================

/// The error between the ground truth and the estimated pose.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateError {
    /// Euclidean position error in cm.
    pub position: f64,
    /// Absolute heading error in radians, the short way round.
    pub heading: f64,
}

impl StateError {
    pub fn between(truth: &PoseEstimate, estimate: &PoseEstimate) -> Self {
        Self {
            position: truth.distance_to(estimate),
            heading: angle_difference(truth.h, estimate.h).abs(),
        }
    }
}

// =========================================================================
// == Run Summary ==
// =========================================================================

/// Accumulates per-cycle errors into a [`ScenarioReport`].
#[derive(Debug, Clone, Default)]
pub struct ErrorAccumulator {
    count: usize,
    sum_sq_position: f64,
    sum_sq_heading: f64,
    sum_uncertainty_xy: f64,
    sum_uncertainty_h: f64,
    last: StateError,
}

impl ErrorAccumulator {
    pub fn record(&mut self, error: StateError, uncertainty: &PoseUncertainty) {
        self.count += 1;
        self.sum_sq_position += error.position * error.position;
        self.sum_sq_heading += error.heading * error.heading;
        self.sum_uncertainty_xy += uncertainty.x.hypot(uncertainty.y);
        self.sum_uncertainty_h += uncertainty.h;
        self.last = error;
    }

    pub fn report(&self, name: &str, seed: u64) -> ScenarioReport {
        let n = self.count.max(1) as f64;
        ScenarioReport {
            name: name.to_string(),
            seed,
            cycles: self.count,
            final_position_error: self.last.position,
            final_heading_error_deg: self.last.heading.to_degrees(),
            rms_position_error: (self.sum_sq_position / n).sqrt(),
            rms_heading_error_deg: (self.sum_sq_heading / n).sqrt().to_degrees(),
            mean_uncertainty_xy: self.sum_uncertainty_xy / n,
            mean_uncertainty_h_deg: (self.sum_uncertainty_h / n).to_degrees(),
        }
    }
}

/// Summary of one scenario run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub name: String,
    pub seed: u64,
    pub cycles: usize,
    pub final_position_error: f64,
    pub final_heading_error_deg: f64,
    pub rms_position_error: f64,
    pub rms_heading_error_deg: f64,
    /// Mean of `hypot(x_uncert, y_uncert)` over the run.
    pub mean_uncertainty_xy: f64,
    pub mean_uncertainty_h_deg: f64,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scenario '{}' (seed {}, {} cycles)", self.name, self.seed, self.cycles)?;
        writeln!(
            f,
            "  final error   | Pos Err: {:.1}cm | Heading Err: {:.1}°",
            self.final_position_error, self.final_heading_error_deg
        )?;
        writeln!(
            f,
            "  RMS error     | Pos Err: {:.1}cm | Heading Err: {:.1}°",
            self.rms_position_error, self.rms_heading_error_deg
        )?;
        write!(
            f,
            "  mean reported | Pos σ:   {:.1}cm | Heading σ:   {:.1}°",
            self.mean_uncertainty_xy, self.mean_uncertainty_h_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn heading_error_takes_the_short_way() {
        let truth = PoseEstimate::new(0.0, 0.0, 179f64.to_radians());
        let estimate = PoseEstimate::new(3.0, 4.0, -179f64.to_radians());
        let e = StateError::between(&truth, &estimate);
        assert_abs_diff_eq!(e.position, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(e.heading, 2f64.to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn rms_over_cycles() {
        let mut acc = ErrorAccumulator::default();
        let u = PoseUncertainty::new(3.0, 4.0, 0.1);
        acc.record(StateError { position: 3.0, heading: 0.0 }, &u);
        acc.record(StateError { position: 4.0, heading: 0.0 }, &u);
        let report = acc.report("rms", 1);
        assert_eq!(report.cycles, 2);
        assert_abs_diff_eq!(report.rms_position_error, 12.5f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(report.final_position_error, 4.0);
        assert_abs_diff_eq!(report.mean_uncertainty_xy, 5.0, epsilon = 1e-12);
        assert!(report.to_string().contains("Scenario 'rms'"));
    }
}
