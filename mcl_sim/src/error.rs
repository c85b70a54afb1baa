// mcl_sim/src/error.rs

use std::path::PathBuf;

use mcl_core::error::ConfigError;
use thiserror::Error;

/// Everything that can stop a scenario from starting. Once a runner is built,
/// a run itself cannot fail.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario file not found: {0}")]
    MissingScenario(PathBuf),

    #[error("no scenario files (*.toml) found under {0}")]
    NoScenarios(PathBuf),

    #[error("failed to load or parse scenario: {0}")]
    Parse(#[from] figment::Error),

    #[error("invalid scenario '{name}': {reason}")]
    InvalidScenario { name: String, reason: String },

    #[error("invalid filter configuration in scenario '{name}'")]
    InvalidFilter {
        name: String,
        #[source]
        source: ConfigError,
    },
}
