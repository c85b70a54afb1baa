// mcl_core/src/estimation/aggregation.rs

//! Weight normalisation and extraction of the published estimate.

use log::warn;
use std::f64::consts::PI;

use crate::estimation::particle::Particle;
use crate::types::{normalize_angle, PoseEstimate, PoseUncertainty};

/// Normalises weights to sum to 1.
///
/// When the total is zero, non-finite or too small to divide by, every weight
/// is reset to `1/M` instead. Returns `true` if that reset happened.
pub fn normalize_weights<A>(particles: &mut [Particle<A>]) -> bool {
    if particles.is_empty() {
        return false;
    }
    let total: f64 = particles.iter().map(|p| p.weight).sum();

    if !total.is_finite() || total < f64::MIN_POSITIVE {
        warn!(
            "Particle weights collapsed (sum = {}); resetting {} particles to uniform.",
            total,
            particles.len()
        );
        let uniform = 1.0 / particles.len() as f64;
        particles.iter_mut().for_each(|p| p.weight = uniform);
        return true;
    }

    particles.iter_mut().for_each(|p| p.weight /= total);
    false
}

/// `1 / Σ w²` over normalised weights. Ranges from 1 (all weight on one
/// particle) to M (uniform).
pub fn effective_sample_size<A>(particles: &[Particle<A>]) -> f64 {
    let sum_sq: f64 = particles.iter().map(|p| p.weight * p.weight).sum();
    if sum_sq > 0.0 {
        1.0 / sum_sq
    } else {
        0.0
    }
}

/// Weighted mean and standard deviation of the population.
///
/// Expects normalised weights. Position uses ordinary weighted moments; heading
/// uses the circular mean of unit vectors and `sqrt(-2 ln R)` as its spread,
/// capped at π when the headings cancel out.
pub fn weighted_pose<A>(particles: &[Particle<A>]) -> (PoseEstimate, PoseUncertainty) {
    let (mut mx, mut my, mut s, mut c) = (0.0, 0.0, 0.0, 0.0);
    for p in particles {
        mx += p.weight * p.pose.x;
        my += p.weight * p.pose.y;
        s += p.weight * p.pose.h.sin();
        c += p.weight * p.pose.h.cos();
    }

    let (mut vx, mut vy) = (0.0, 0.0);
    for p in particles {
        vx += p.weight * (p.pose.x - mx).powi(2);
        vy += p.weight * (p.pose.y - my).powi(2);
    }

    let resultant = s.hypot(c).min(1.0);
    let h_sd = if resultant > 0.0 {
        (-2.0 * resultant.ln()).max(0.0).sqrt().min(PI)
    } else {
        PI
    };
    let h = if resultant > 0.0 {
        normalize_angle(s.atan2(c))
    } else {
        0.0
    };

    (
        PoseEstimate { x: mx, y: my, h },
        PoseUncertainty::new(vx.max(0.0).sqrt(), vy.max(0.0).sqrt(), h_sd),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn population(poses: &[(f64, f64, f64)], weights: &[f64]) -> Vec<Particle> {
        poses
            .iter()
            .zip(weights)
            .map(|(&(x, y, h), &w)| Particle::new(PoseEstimate::new(x, y, h), w))
            .collect()
    }

    #[test]
    fn weights_sum_to_one_after_normalisation() {
        let mut ps = population(&[(0.0, 0.0, 0.0); 4], &[1.0, 3.0, 0.5, 0.5]);
        assert!(!normalize_weights(&mut ps));
        let total: f64 = ps.iter().map(|p| p.weight).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ps[1].weight, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_weights_reset_to_uniform() {
        for bad in [[0.0; 5], [f64::NAN; 5], [f64::INFINITY; 5]] {
            let mut ps = population(&[(0.0, 0.0, 0.0); 5], &bad);
            assert!(normalize_weights(&mut ps));
            for p in &ps {
                assert_abs_diff_eq!(p.weight, 0.2, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn effective_sample_size_bounds() {
        let uniform = population(&[(0.0, 0.0, 0.0); 10], &[0.1; 10]);
        assert_abs_diff_eq!(effective_sample_size(&uniform), 10.0, epsilon = 1e-9);

        let mut peaked = population(&[(0.0, 0.0, 0.0); 10], &[0.0; 10]);
        peaked[3].weight = 1.0;
        assert_abs_diff_eq!(effective_sample_size(&peaked), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn circular_mean_across_the_wrap() {
        let d = std::f64::consts::PI / 180.0;
        let ps = population(&[(0.0, 0.0, 179.0 * d), (0.0, 0.0, -179.0 * d)], &[0.5, 0.5]);
        let (est, unc) = weighted_pose(&ps);
        assert_abs_diff_eq!(est.h.abs(), PI, epsilon = 1e-9);
        // An arithmetic mean would have given 0 here.
        assert!(unc.h < 2.0 * d);
    }

    #[test]
    fn weighted_position_moments() {
        let ps = population(&[(0.0, 10.0, 0.0), (100.0, 10.0, 0.0)], &[0.25, 0.75]);
        let (est, unc) = weighted_pose(&ps);
        assert_abs_diff_eq!(est.x, 75.0, epsilon = 1e-9);
        assert_abs_diff_eq!(est.y, 10.0, epsilon = 1e-9);
        // sqrt(0.25 * 75² + 0.75 * 25²)
        assert_abs_diff_eq!(unc.x, (0.25f64 * 5625.0 + 0.75 * 625.0).sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(unc.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(unc.h, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn opposite_headings_are_maximally_uncertain() {
        let ps = population(&[(0.0, 0.0, 0.0), (0.0, 0.0, PI)], &[0.5, 0.5]);
        let (_, unc) = weighted_pose(&ps);
        assert_abs_diff_eq!(unc.h, PI, epsilon = 1e-6);
    }
}
