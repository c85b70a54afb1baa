// mcl_core/src/models/mod.rs

pub mod measurement;
pub mod motion;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Draws from N(0, sd²). A non-positive `sd` yields exactly zero, so a zero
/// coefficient anywhere in the config means "no noise" rather than an error.
pub fn sample_gaussian<R: Rng + ?Sized>(rng: &mut R, sd: f64) -> f64 {
    if sd > 0.0 {
        let z: f64 = StandardNormal.sample(rng);
        z * sd
    } else {
        0.0
    }
}
