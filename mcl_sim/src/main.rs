// mcl_sim/src/main.rs

//! Runs one scenario file, or every scenario under a directory, and prints the
//! localization error of each.
//!
//! To run the default scenario from the `mcl_sim` directory:
//! `cargo run --bin mcl_sim`
//!
//! Logging follows `RUST_LOG` (default `info`); `RUST_LOG=mcl_core=debug`
//! shows every filter cycle.

use anyhow::Context;
use clap::Parser;

use mcl_sim::cli::Cli;
use mcl_sim::simulation::config::{load_scenario, scenario_name};
use mcl_sim::simulation::runner::ScenarioRunner;

/// Print a trace line every this many cycles when not in report-only mode.
const TRACE_EVERY: usize = 10;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let overrides = cli.overrides();
    let mut reports = Vec::new();

    for path in cli.scenario_paths()? {
        let name = scenario_name(&path);
        let config = load_scenario(&path, &overrides)
            .with_context(|| format!("Could not load scenario '{}'", path.display()))?;

        if cli.dump_config {
            println!("# --- {} (resolved) ---", name);
            println!("{}", toml::to_string_pretty(&config)?);
        }

        let runner = ScenarioRunner::new(&name, config)?;
        let report = runner.run(|record| {
            if !cli.headless_report && record.cycle % TRACE_EVERY == 0 {
                println!(
                    "[{:>4}] truth ({:>6.1}, {:>6.1}, {:>6.1}°)  est ({:>6.1}, {:>6.1}, {:>6.1}°)  σ ({:>5.1}, {:>5.1}, {:>5.1}°)  err {:>5.1}cm {:>5.1}°  obs {}",
                    record.cycle,
                    record.truth.x,
                    record.truth.y,
                    record.truth.heading_deg(),
                    record.estimate.x,
                    record.estimate.y,
                    record.estimate.heading_deg(),
                    record.uncertainty.x,
                    record.uncertainty.y,
                    record.uncertainty.h_deg(),
                    record.error.position,
                    record.error.heading.to_degrees(),
                    record.observations
                );
            }
        });
        reports.push(report);
    }

    for report in &reports {
        println!("{}", report);
    }
    Ok(())
}
