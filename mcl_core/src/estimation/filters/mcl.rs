// mcl_core/src/estimation/filters/mcl.rs

use std::f64::consts::PI;
use std::sync::Arc;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{InitialDistribution, MclConfig, ResamplePolicy};
use crate::error::ConfigError;
use crate::estimation::particle::Particle;
use crate::estimation::{aggregation, resampling, PoseEstimator};
use crate::mapping::{FieldBounds, FieldLandmarkMap};
use crate::messages::LandmarkObservation;
use crate::models::measurement::LandmarkMeasurementModel;
use crate::models::motion::OdometryMotionModel;
use crate::models::sample_gaussian;
use crate::types::{normalize_angle, MotionDelta, PoseEstimate, PoseUncertainty};

/// A Monte Carlo Localization filter over a fixed landmark map.
///
/// The belief is a population of `particle_count` weighted pose hypotheses.
/// Each call to [`update_localization`](Self::update_localization) moves every
/// hypothesis by the reported odometry, reweights it by how well it explains
/// the landmark observations, publishes the weighted mean as the estimate and
/// finally redraws the population around the likely hypotheses.
///
/// `R` is the random source for every stochastic step; `A` is an optional
/// per-particle payload carried through resampling.
pub struct MonteCarloLocalization<R = ChaCha8Rng, A = ()> {
    config: MclConfig,
    map: Arc<FieldLandmarkMap>,
    motion: OdometryMotionModel,
    measurement: LandmarkMeasurementModel,
    particles: Vec<Particle<A>>,
    estimate: PoseEstimate,
    uncertainty: PoseUncertainty,
    effective_sample_size: f64,
    cycle: u64,
    rng: R,
}

impl MonteCarloLocalization {
    /// Builds a filter driven by a `ChaCha8Rng` seeded with `seed`.
    pub fn from_seed(
        config: MclConfig,
        map: Arc<FieldLandmarkMap>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(config, map, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng, A: Clone + Default> MonteCarloLocalization<R, A> {
    /// Validates `config` and draws the initial population from
    /// `config.initial_distribution`.
    pub fn new(config: MclConfig, map: Arc<FieldLandmarkMap>, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        if map.points().is_empty() && map.lines().is_empty() {
            return Err(ConfigError::EmptyLandmarkMap);
        }

        let mut filter = Self {
            motion: OdometryMotionModel::new(config.motion_noise),
            measurement: LandmarkMeasurementModel::new(
                config.point_likelihood,
                config.line_likelihood,
                config.similarity_floor,
            ),
            particles: Vec::with_capacity(config.particle_count),
            estimate: PoseEstimate::default(),
            uncertainty: PoseUncertainty::default(),
            effective_sample_size: config.particle_count as f64,
            cycle: 0,
            rng,
            map,
            config,
        };
        let initial = filter.config.initial_distribution;
        filter.populate(&initial);
        filter.publish_from_particles();

        info!(
            "MCL initialized with {} particles ({:?}), map has {} points and {} lines.",
            filter.config.particle_count,
            filter.config.initial_distribution,
            filter.map.points().len(),
            filter.map.lines().len()
        );
        Ok(filter)
    }

    // --- Cycle ---

    /// Runs one localization cycle.
    ///
    /// With an empty `observations` slice only the motion update runs: weights
    /// are left as they were and no resampling happens, so the spread can only
    /// grow.
    pub fn update_localization(&mut self, delta: MotionDelta, observations: &[LandmarkObservation]) {
        self.motion_update(&delta);

        let observed = !observations.is_empty();
        if observed {
            self.measurement_update(observations);
        }

        aggregation::normalize_weights(&mut self.particles);
        self.effective_sample_size = aggregation::effective_sample_size(&self.particles);
        self.publish_from_particles();

        let resampled = observed && self.resampling_due();
        if resampled {
            self.particles =
                resampling::resample(&self.particles, &self.config.resampling.noise, &mut self.rng);
        }

        self.cycle += 1;
        debug!(
            "MCL cycle {}: {} observations, ESS {:.1}/{}, resampled: {}, estimate ({:.1}, {:.1}, {:.1}°) ± ({:.1}, {:.1}, {:.1}°)",
            self.cycle,
            observations.len(),
            self.effective_sample_size,
            self.particles.len(),
            resampled,
            self.estimate.x,
            self.estimate.y,
            self.estimate.heading_deg(),
            self.uncertainty.x,
            self.uncertainty.y,
            self.uncertainty.h_deg()
        );
    }

    fn motion_update(&mut self, delta: &MotionDelta) {
        if delta.is_zero() {
            return;
        }
        for p in &mut self.particles {
            p.pose = self.motion.predict(&p.pose, delta, &mut self.rng);
        }
    }

    /// Multiplies each weight by the product of observation similarities. The
    /// product is formed as a sum of logs and re-exponentiated relative to the
    /// best particle, so long observation lists cannot underflow.
    fn measurement_update(&mut self, observations: &[LandmarkObservation]) {
        let map = &*self.map;
        let log_weights: Vec<f64> = self
            .particles
            .iter()
            .map(|p| p.weight.ln() + self.measurement.log_likelihood(&p.pose, observations, map))
            .collect();

        let max = log_weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            warn!("No particle has a finite log weight after the measurement update; resetting to uniform.");
            self.particles.iter_mut().for_each(|p| p.weight = 1.0);
            return;
        }

        for (p, lw) in self.particles.iter_mut().zip(log_weights) {
            p.weight = (lw - max).exp();
        }
    }

    fn resampling_due(&self) -> bool {
        match self.config.resampling.policy {
            ResamplePolicy::Always => true,
            ResamplePolicy::EffectiveSampleSize { threshold } => {
                self.effective_sample_size < threshold * self.particles.len() as f64
            }
        }
    }

    fn publish_from_particles(&mut self) {
        let (estimate, uncertainty) = aggregation::weighted_pose(&self.particles);
        self.estimate = estimate;
        self.uncertainty = uncertainty;
    }

    fn populate(&mut self, distribution: &InitialDistribution) {
        let m = self.config.particle_count;
        let bounds = self.map.bounds();
        let weight = 1.0 / m as f64;
        self.particles = (0..m)
            .map(|_| Particle::new(initial_pose(distribution, bounds, &mut self.rng), weight))
            .collect();
        self.effective_sample_size = m as f64;
    }

    // --- Re-initialisation ---

    /// Redraws the population as a Gaussian cloud around `pose`. The published
    /// estimate becomes `pose` with `spread` as its uncertainty.
    pub fn reset_to_pose(&mut self, pose: PoseEstimate, spread: PoseUncertainty) {
        self.populate(&InitialDistribution::Seeded { pose, spread });
        self.estimate = PoseEstimate::new(pose.x, pose.y, pose.h);
        self.uncertainty = spread;
        info!(
            "MCL reset to ({:.1}, {:.1}, {:.1}°) ± ({:.1}, {:.1}, {:.1}°).",
            pose.x,
            pose.y,
            pose.heading_deg(),
            spread.x,
            spread.y,
            spread.h_deg()
        );
    }

    /// Spreads the population uniformly over the whole field, any heading.
    pub fn reset_uniform(&mut self) {
        self.populate(&InitialDistribution::UniformField);
        self.publish_from_particles();
        info!("MCL reset to a uniform belief over the field.");
    }

    // --- Published estimate ---

    pub fn estimate(&self) -> PoseEstimate {
        self.estimate
    }

    pub fn uncertainty(&self) -> PoseUncertainty {
        self.uncertainty
    }

    pub fn x_est(&self) -> f64 {
        self.estimate.x
    }

    pub fn y_est(&self) -> f64 {
        self.estimate.y
    }

    pub fn h_est(&self) -> f64 {
        self.estimate.h
    }

    pub fn h_est_deg(&self) -> f64 {
        self.estimate.heading_deg()
    }

    pub fn x_uncert(&self) -> f64 {
        self.uncertainty.x
    }

    pub fn y_uncert(&self) -> f64 {
        self.uncertainty.y
    }

    pub fn h_uncert(&self) -> f64 {
        self.uncertainty.h
    }

    pub fn h_uncert_deg(&self) -> f64 {
        self.uncertainty.h_deg()
    }

    /// Overrides the published estimate until the next completed cycle. The
    /// particles are not touched.
    pub fn set_estimate(&mut self, estimate: PoseEstimate) {
        self.estimate = PoseEstimate::new(estimate.x, estimate.y, estimate.h);
    }

    /// Overrides the published uncertainty until the next completed cycle.
    pub fn set_uncertainty(&mut self, uncertainty: PoseUncertainty) {
        self.uncertainty = uncertainty;
    }

    pub fn set_x_est(&mut self, x: f64) {
        self.estimate.x = x;
    }

    pub fn set_y_est(&mut self, y: f64) {
        self.estimate.y = y;
    }

    /// Heading in radians; wrapped into (−π, π].
    pub fn set_h_est(&mut self, h: f64) {
        self.estimate.h = normalize_angle(h);
    }

    pub fn set_x_uncert(&mut self, sd: f64) {
        self.uncertainty.x = sd;
    }

    pub fn set_y_uncert(&mut self, sd: f64) {
        self.uncertainty.y = sd;
    }

    pub fn set_h_uncert(&mut self, sd: f64) {
        self.uncertainty.h = sd;
    }

    // --- Introspection ---

    /// ESS of the weighted population seen by the last aggregation.
    pub fn effective_sample_size(&self) -> f64 {
        self.effective_sample_size
    }

    pub fn particles(&self) -> &[Particle<A>] {
        &self.particles
    }

    /// Mutable access for drivers that evolve the per-particle payload. The
    /// population size cannot change through this slice.
    pub fn particles_mut(&mut self) -> &mut [Particle<A>] {
        &mut self.particles
    }

    /// Number of completed `update_localization` calls.
    pub fn cycle_count(&self) -> u64 {
        self.cycle
    }

    pub fn config(&self) -> &MclConfig {
        &self.config
    }

    pub fn map(&self) -> &Arc<FieldLandmarkMap> {
        &self.map
    }
}

impl<R, A> PoseEstimator for MonteCarloLocalization<R, A>
where
    R: Rng + Send,
    A: Clone + Default + Send,
{
    fn update_localization(&mut self, delta: MotionDelta, observations: &[LandmarkObservation]) {
        MonteCarloLocalization::update_localization(self, delta, observations);
    }

    fn estimate(&self) -> PoseEstimate {
        self.estimate
    }

    fn uncertainty(&self) -> PoseUncertainty {
        self.uncertainty
    }
}

/// Draws one pose from an initial distribution.
fn initial_pose<R: Rng + ?Sized>(
    distribution: &InitialDistribution,
    bounds: FieldBounds,
    rng: &mut R,
) -> PoseEstimate {
    match *distribution {
        InitialDistribution::UniformField => PoseEstimate::new(
            uniform_offset(rng, bounds.half_length),
            uniform_offset(rng, bounds.half_width),
            uniform_offset(rng, PI),
        ),
        InitialDistribution::UniformRegion {
            center,
            half_extent_x,
            half_extent_y,
            half_extent_h,
        } => PoseEstimate::new(
            center.x + uniform_offset(rng, half_extent_x),
            center.y + uniform_offset(rng, half_extent_y),
            center.h + uniform_offset(rng, half_extent_h),
        ),
        InitialDistribution::Seeded { pose, spread } => PoseEstimate::new(
            pose.x + sample_gaussian(rng, spread.x),
            pose.y + sample_gaussian(rng, spread.y),
            pose.h + sample_gaussian(rng, spread.h),
        ),
    }
}

/// Uniform in `[-half, half]`; exactly zero for a degenerate extent.
fn uniform_offset<R: Rng + ?Sized>(rng: &mut R, half: f64) -> f64 {
    if half > 0.0 {
        rng.gen_range(-half..=half)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::standard_field;
    use crate::messages::{LandmarkAssociation, PointSighting};
    use crate::models::measurement::point;
    use approx::assert_abs_diff_eq;

    fn map() -> Arc<FieldLandmarkMap> {
        Arc::new(standard_field())
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = MclConfig {
            particle_count: 0,
            ..MclConfig::default()
        };
        assert_eq!(
            MonteCarloLocalization::from_seed(config, map(), 1).err(),
            Some(ConfigError::NoParticles)
        );
    }

    #[test]
    fn uniform_field_prior_covers_the_field() {
        let mcl = MonteCarloLocalization::from_seed(MclConfig::default(), map(), 1).unwrap();
        let bounds = mcl.map().bounds();
        assert_eq!(mcl.particles().len(), 100);
        for p in mcl.particles() {
            assert!(p.pose.x.abs() <= bounds.half_length);
            assert!(p.pose.y.abs() <= bounds.half_width);
            assert_abs_diff_eq!(p.weight, 0.01, epsilon = 1e-12);
        }
        assert!(mcl.x_uncert() > 100.0);
        assert!(mcl.h_uncert() > 1.0);
    }

    #[test]
    fn same_seed_same_run() {
        let run = |seed| {
            let mut mcl = MonteCarloLocalization::from_seed(MclConfig::default(), map(), seed).unwrap();
            for _ in 0..5 {
                mcl.update_localization(MotionDelta::new(10.0, 0.0, 0.05), &[]);
            }
            mcl.estimate()
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn reset_to_pose_publishes_the_pose() {
        let mut mcl = MonteCarloLocalization::from_seed(MclConfig::default(), map(), 3).unwrap();
        let pose = PoseEstimate::new(-120.0, 80.0, 2.0);
        mcl.reset_to_pose(pose, PoseUncertainty::new(5.0, 5.0, 0.1));
        assert_eq!(mcl.estimate(), pose);
        assert_abs_diff_eq!(mcl.x_uncert(), 5.0);

        // Particles cluster around the new pose.
        for p in mcl.particles() {
            assert!(p.pose.distance_to(&pose) < 40.0);
            assert!(normalize_angle(p.pose.h - pose.h).abs() < 0.6);
        }
    }

    #[test]
    fn overrides_last_until_the_next_cycle() {
        let mut mcl = MonteCarloLocalization::from_seed(MclConfig::default(), map(), 4).unwrap();
        mcl.reset_to_pose(PoseEstimate::new(0.0, 0.0, 0.0), PoseUncertainty::new(1.0, 1.0, 0.01));

        mcl.set_estimate(PoseEstimate::new(200.0, 100.0, 4.0));
        mcl.set_uncertainty(PoseUncertainty::new(9.0, 9.0, 0.9));
        assert_abs_diff_eq!(mcl.x_est(), 200.0);
        assert_abs_diff_eq!(mcl.h_est(), normalize_angle(4.0));
        assert_abs_diff_eq!(mcl.y_uncert(), 9.0);

        mcl.update_localization(MotionDelta::ZERO, &[]);
        assert!(mcl.x_est().abs() < 5.0);
        assert!(mcl.y_uncert() < 5.0);
    }

    #[test]
    fn component_setters_override_single_fields() {
        let mut mcl = MonteCarloLocalization::from_seed(MclConfig::default(), map(), 9).unwrap();
        mcl.reset_to_pose(PoseEstimate::new(10.0, 20.0, 0.5), PoseUncertainty::new(3.0, 4.0, 0.2));

        mcl.set_x_est(-50.0);
        mcl.set_h_est(3.0 * PI / 2.0);
        mcl.set_y_uncert(12.0);
        mcl.set_h_uncert(0.7);
        assert_abs_diff_eq!(mcl.x_est(), -50.0);
        assert_abs_diff_eq!(mcl.y_est(), 20.0);
        assert_abs_diff_eq!(mcl.h_est(), -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mcl.x_uncert(), 3.0);
        assert_abs_diff_eq!(mcl.y_uncert(), 12.0);
        assert_abs_diff_eq!(mcl.h_uncert(), 0.7);

        mcl.set_y_est(5.0);
        mcl.set_x_uncert(1.5);
        let estimate = mcl.estimate();
        assert_abs_diff_eq!(estimate.x, -50.0);
        assert_abs_diff_eq!(estimate.y, 5.0);
        assert_abs_diff_eq!(estimate.h, -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mcl.uncertainty().x, 1.5);
    }

    #[test]
    fn degrees_accessors_match_radians() {
        let mut mcl = MonteCarloLocalization::from_seed(MclConfig::default(), map(), 5).unwrap();
        mcl.reset_to_pose(
            PoseEstimate::new(0.0, 0.0, PI / 2.0),
            PoseUncertainty::new(0.0, 0.0, PI / 18.0),
        );
        assert_abs_diff_eq!(mcl.h_est_deg(), 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mcl.h_uncert_deg(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn ess_policy_skips_resampling_while_weights_are_even() {
        let config = MclConfig {
            resampling: crate::config::ResamplingConfig {
                policy: ResamplePolicy::EffectiveSampleSize { threshold: 0.5 },
                ..Default::default()
            },
            ..MclConfig::default()
        };
        let mut mcl = MonteCarloLocalization::from_seed(config, map(), 6).unwrap();
        mcl.reset_to_pose(PoseEstimate::new(0.0, 0.0, 0.0), PoseUncertainty::new(0.0, 0.0, 0.0));
        let before: Vec<PoseEstimate> = mcl.particles().iter().map(|p| p.pose).collect();

        // Every particle sits on the same pose, so every weight stays equal and
        // ESS stays at M.
        let post = mcl.map().point_by_name("yellow_goal_left_post").unwrap();
        let z = LandmarkObservation::known_point(post.id, 316.2, 0.2);
        mcl.update_localization(MotionDelta::ZERO, &[z]);

        assert_abs_diff_eq!(mcl.effective_sample_size(), 100.0, epsilon = 1e-6);
        let after: Vec<PoseEstimate> = mcl.particles().iter().map(|p| p.pose).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn ess_policy_resamples_once_weights_collapse() {
        let config = MclConfig {
            resampling: crate::config::ResamplingConfig {
                policy: ResamplePolicy::EffectiveSampleSize { threshold: 0.5 },
                ..Default::default()
            },
            ..MclConfig::default()
        };
        let mut mcl = MonteCarloLocalization::from_seed(config, map(), 10).unwrap();
        let truth = PoseEstimate::new(0.0, 0.0, 0.0);
        mcl.reset_to_pose(truth, PoseUncertainty::new(80.0, 80.0, 0.5));

        // A sharp sighting taken from the true pose; only the few particles
        // near it keep any real weight.
        let post = mcl.map().point_by_name("yellow_goal_left_post").unwrap();
        let expected = point::expected(&truth, post);
        let z = LandmarkObservation::Point(PointSighting {
            distance: expected.distance,
            bearing: expected.bearing,
            association: LandmarkAssociation::Known(post.id),
            distance_sd: Some(2.0),
            bearing_sd: Some(0.02),
        });
        mcl.update_localization(MotionDelta::ZERO, &[z]);

        assert!(mcl.effective_sample_size() < 50.0, "ESS {}", mcl.effective_sample_size());
        for p in mcl.particles() {
            assert_abs_diff_eq!(p.weight, 0.01, epsilon = 1e-12);
        }
    }

    #[test]
    fn aux_payload_survives_resampling() {
        let mut mcl: MonteCarloLocalization<ChaCha8Rng, u32> = MonteCarloLocalization::new(
            MclConfig::default(),
            map(),
            ChaCha8Rng::seed_from_u64(7),
        )
        .unwrap();
        for (i, p) in mcl.particles_mut().iter_mut().enumerate() {
            p.aux = i as u32;
        }
        let post = mcl.map().point_by_name("blue_goal_left_post").unwrap();
        let z = LandmarkObservation::known_point(post.id, 300.0, 0.0);
        mcl.update_localization(MotionDelta::ZERO, &[z]);

        assert_eq!(mcl.particles().len(), 100);
        assert!(mcl.particles().iter().all(|p| p.aux < 100));
        assert_eq!(mcl.cycle_count(), 1);
    }

    #[test]
    fn works_behind_the_trait() {
        let mut estimator: Box<dyn PoseEstimator> =
            Box::new(MonteCarloLocalization::from_seed(MclConfig::default(), map(), 8).unwrap());
        estimator.update_localization(MotionDelta::new(5.0, 0.0, 0.0), &[]);
        let _ = estimator.estimate();
        assert!(estimator.uncertainty().x > 0.0);
    }
}
