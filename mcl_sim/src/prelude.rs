// mcl_sim/src/prelude.rs

// Re-export the entire mcl_core prelude so pure types like `PoseEstimate`,
// `MclConfig` and `PoseEstimator` are at hand.
pub use mcl_core::prelude::*;

// Re-export common simulation-specific types.
pub use crate::error::SimError;
pub use crate::simulation::config::structs::*;
pub use crate::simulation::config::{discover_scenarios, load_scenario, ScenarioOverrides};
pub use crate::simulation::core::prng::SimulationRng;
pub use crate::simulation::debugging::state_error::{ScenarioReport, StateError};
pub use crate::simulation::runner::{CycleRecord, ScenarioRunner};
