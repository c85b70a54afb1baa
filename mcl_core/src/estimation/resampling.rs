// mcl_core/src/estimation/resampling.rs

//! Low-variance (systematic) resampling with optional roughening.

use rand::Rng;

use crate::config::ResamplingNoise;
use crate::estimation::particle::Particle;
use crate::models::sample_gaussian;
use crate::types::PoseEstimate;

/// Indices of the particles selected by systematic resampling.
///
/// One jitter `u0 ∈ [0, 1/M)` is drawn and the pointers `u0 + j/M` walk the
/// cumulative weight distribution once, so the result always has exactly
/// `weights.len()` entries and a particle with zero weight is never chosen.
/// Weights need not be normalised.
pub fn systematic_indices<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Vec<usize> {
    let m = weights.len();
    if m == 0 {
        return Vec::new();
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return (0..m).collect();
    }

    // Pointers walk the normalised distribution so a tiny (even subnormal)
    // total still gives a non-empty jitter range.
    let step = 1.0 / m as f64;
    let u0 = rng.gen_range(0.0..step);

    // Last index with positive weight; guards against the pointer running past
    // the cumulative sum through rounding.
    let last_positive = weights.iter().rposition(|w| *w > 0.0).unwrap_or(m - 1);

    let mut indices = Vec::with_capacity(m);
    let mut i = 0;
    let mut cumulative = weights[0] / total;
    for j in 0..m {
        let pointer = u0 + j as f64 * step;
        while pointer >= cumulative && i < last_positive {
            i += 1;
            cumulative += weights[i] / total;
        }
        indices.push(i);
    }
    indices
}

/// Draws a new population of the same size, weight `1/M` each, with poses and
/// aux copied from the selected sources and then roughened.
pub fn resample<A: Clone, R: Rng + ?Sized>(
    particles: &[Particle<A>],
    noise: &ResamplingNoise,
    rng: &mut R,
) -> Vec<Particle<A>> {
    let weights: Vec<f64> = particles.iter().map(|p| p.weight).collect();
    let uniform = 1.0 / particles.len().max(1) as f64;

    systematic_indices(&weights, rng)
        .into_iter()
        .map(|i| {
            let source = &particles[i];
            let pose = PoseEstimate::new(
                source.pose.x + sample_gaussian(rng, noise.xy),
                source.pose.y + sample_gaussian(rng, noise.xy),
                source.pose.h + sample_gaussian(rng, noise.h),
            );
            Particle::with_aux(pose, uniform, source.aux.clone())
        })
        .collect()
}
