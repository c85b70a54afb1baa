// mcl_sim/src/lib.rs

//! Headless scenario driver for `mcl_core`.
//!
//! A scenario describes a robot driving around the standard field, the noise
//! of its odometry and vision, and the filter configuration. The runner
//! simulates ground truth, feeds the estimator once per control cycle and
//! scores the published estimate against the truth.

// This prelude is for convenience for other files WITHIN the mcl_sim crate.
pub mod prelude;

pub mod cli;
pub mod error;
pub mod simulation;
