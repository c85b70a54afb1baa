// mcl_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

use crate::error::SimError;
use crate::simulation::config::{discover_scenarios, ScenarioOverrides};

pub const DEFAULT_SCENARIO: &str = "assets/scenarios/00_tracking.toml";

/// mcl_sim: run Monte Carlo localization against simulated field scenarios.
///
/// This struct defines the command-line arguments of the `mcl_sim` binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, conflicts_with = "scenario_dir")]
    pub scenario: Option<PathBuf>,

    /// Run every scenario file found (recursively) under this directory.
    #[arg(long)]
    pub scenario_dir: Option<PathBuf>,

    /// Override the scenario's random seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of control cycles to simulate.
    #[arg(long)]
    pub cycles: Option<usize>,

    /// Print only the per-scenario summary, no per-cycle trace.
    #[arg(long, default_value_t = false)]
    pub headless_report: bool,

    /// Print each resolved scenario (defaults filled in) as TOML before running it.
    #[arg(long, default_value_t = false)]
    pub dump_config: bool,
}

impl Cli {
    /// The scenario files this invocation should run, in order.
    pub fn scenario_paths(&self) -> Result<Vec<PathBuf>, SimError> {
        match (&self.scenario_dir, &self.scenario) {
            (Some(dir), _) => discover_scenarios(dir),
            (None, Some(file)) => Ok(vec![file.clone()]),
            (None, None) => Ok(vec![PathBuf::from(DEFAULT_SCENARIO)]),
        }
    }

    pub fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            seed: self.seed,
            cycles: self.cycles,
        }
    }
}
