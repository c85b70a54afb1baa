// mcl_sim/src/simulation/config/mod.rs

//! This module handles loading and validating scenario configuration from
//! disk. Every section and field is optional; figment layers the file on top
//! of the serialized defaults, then command-line overrides on top of that.

pub mod structs;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use log::{info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::SimError;
pub use structs::ScenarioConfig;

/// Values from the command line that take precedence over the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioOverrides {
    pub seed: Option<u64>,
    pub cycles: Option<usize>,
}

impl ScenarioOverrides {
    fn apply(&self, mut figment: Figment) -> Figment {
        if let Some(seed) = self.seed {
            figment = figment.merge(Serialized::default("simulation.seed", seed));
        }
        if let Some(cycles) = self.cycles {
            figment = figment.merge(Serialized::default("simulation.cycles", cycles));
        }
        figment
    }
}

/// Loads, overrides and validates one scenario file.
pub fn load_scenario(path: &Path, overrides: &ScenarioOverrides) -> Result<ScenarioConfig, SimError> {
    if !path.is_file() {
        return Err(SimError::MissingScenario(path.to_path_buf()));
    }
    info!("Loading scenario from: {}", path.display());

    let figment = Figment::from(Serialized::defaults(ScenarioConfig::default())).merge(Toml::file(path));
    let config: ScenarioConfig = overrides.apply(figment).extract()?;
    validate(&scenario_name(path), &config)?;
    Ok(config)
}

/// Same as [`load_scenario`] for TOML that is already in memory.
pub fn load_scenario_str(
    name: &str,
    toml: &str,
    overrides: &ScenarioOverrides,
) -> Result<ScenarioConfig, SimError> {
    let figment = Figment::from(Serialized::defaults(ScenarioConfig::default())).merge(Toml::string(toml));
    let config: ScenarioConfig = overrides.apply(figment).extract()?;
    validate(name, &config)?;
    Ok(config)
}

/// Walks `dir` recursively and returns every `.toml` file, sorted by path.
pub fn discover_scenarios(dir: &Path) -> Result<Vec<PathBuf>, SimError> {
    if !dir.is_dir() {
        warn!("Scenario directory not found at {:?}.", dir);
        return Err(SimError::NoScenarios(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| {
            !e.file_type().is_dir() && e.path().extension().map_or(false, |ext| ext == "toml")
        })
        .map(|e| e.into_path())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(SimError::NoScenarios(dir.to_path_buf()));
    }
    info!("Found {} scenario(s) under {:?}", paths.len(), dir);
    Ok(paths)
}

/// A short display name: the file stem.
pub fn scenario_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn validate(name: &str, config: &ScenarioConfig) -> Result<(), SimError> {
    let invalid = |reason: &str| SimError::InvalidScenario {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if config.simulation.vision_period == 0 {
        return Err(invalid("simulation.vision_period must be at least 1"));
    }
    if config.robot.command.iter().all(|segment| segment.cycles == 0) {
        return Err(invalid("robot.command needs at least one segment with cycles > 0"));
    }
    let fov = config.vision.field_of_view_deg;
    if !(fov > 0.0 && fov <= 360.0) {
        return Err(invalid("vision.field_of_view_deg must lie in (0, 360]"));
    }
    if !(0.0..=1.0).contains(&config.vision.spurious_rate) {
        return Err(invalid("vision.spurious_rate must lie in [0, 1]"));
    }
    let noise = [
        config.vision.max_distance,
        config.vision.distance_sd,
        config.vision.distance_sd_per_cm,
        config.vision.bearing_sd,
        config.vision.orientation_sd,
        config.odometry.forward,
        config.odometry.lateral,
        config.odometry.rotational,
        config.odometry.translation_to_rotation,
    ];
    if noise.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(invalid("vision and odometry parameters must be finite and non-negative"));
    }

    config.filter.validate().map_err(|source| SimError::InvalidFilter {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::structs::IdentityMode;
    use mcl_core::config::{InitialDistribution, ResamplePolicy};

    #[test]
    fn empty_file_gives_defaults() {
        let config = load_scenario_str("empty", "", &ScenarioOverrides::default()).unwrap();
        assert_eq!(config, ScenarioConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml = r#"
            [simulation]
            seed = 7

            [vision]
            identity = "Candidates"

            [filter]
            particle_count = 250

            [filter.resampling.policy]
            type = "EffectiveSampleSize"
            threshold = 0.5

            [filter.initial_distribution]
            type = "Seeded"
            pose = { x = -150.0, y = 0.0, h = 0.0 }
            spread = { x = 20.0, y = 20.0, h = 0.2 }
        "#;
        let config = load_scenario_str("partial", toml, &ScenarioOverrides::default()).unwrap();
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.cycles, 300);
        assert_eq!(config.vision.identity, IdentityMode::Candidates);
        assert_eq!(config.vision.max_distance, 450.0);
        assert_eq!(config.filter.particle_count, 250);
        assert_eq!(
            config.filter.resampling.policy,
            ResamplePolicy::EffectiveSampleSize { threshold: 0.5 }
        );
        assert!(matches!(
            config.filter.initial_distribution,
            InitialDistribution::Seeded { .. }
        ));
    }

    #[test]
    fn overrides_win_over_the_file() {
        let toml = "[simulation]\nseed = 1\ncycles = 10\n";
        let overrides = ScenarioOverrides {
            seed: Some(99),
            cycles: Some(20),
        };
        let config = load_scenario_str("o", toml, &overrides).unwrap();
        assert_eq!(config.simulation.seed, Some(99));
        assert_eq!(config.simulation.cycles, 20);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml = "[vision]\nmax_dist = 100.0\n";
        assert!(matches!(
            load_scenario_str("typo", toml, &ScenarioOverrides::default()),
            Err(SimError::Parse(_))
        ));
    }

    #[test]
    fn bad_filter_config_is_reported() {
        let toml = "[filter]\nparticle_count = 0\n";
        assert!(matches!(
            load_scenario_str("bad", toml, &ScenarioOverrides::default()),
            Err(SimError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn zero_vision_period_is_rejected() {
        let toml = "[simulation]\nvision_period = 0\n";
        assert!(matches!(
            load_scenario_str("bad", toml, &ScenarioOverrides::default()),
            Err(SimError::InvalidScenario { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let path = Path::new("definitely/not/here.toml");
        assert!(matches!(
            load_scenario(path, &ScenarioOverrides::default()),
            Err(SimError::MissingScenario(_))
        ));
    }
}
