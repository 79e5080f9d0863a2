// lane_sim/examples/01_reference_run.rs

//! Runs the bundled reference scenario without the CLI and prints every
//! posterior as a table.
//!
//! To run this example:
//! `cargo run -p lane_sim --example 01_reference_run`

use lane_sim::prelude::*;
use lane_sim::simulation::config::resolve_scenario;
use lane_sim::simulation::core::runner::run_scenario;
use std::fs;

fn main() {
    // --- 1. Load Scenario Configuration ---
    let scenario_path = concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/scenarios/reference_ramp.toml");
    println!("Loading scenario from: {}", scenario_path);

    let config: ScenarioConfig = match fs::read_to_string(scenario_path) {
        Ok(toml_string) => toml::from_str(&toml_string).unwrap_or_else(|err| {
            panic!("Failed to parse scenario: {}", err);
        }),
        Err(e) => {
            panic!(
                "Could not find or read scenario file at '{}'. Error: {}",
                scenario_path, e
            );
        }
    };

    // --- 2. Resolve and Run ---
    // The reference run needs no noise profiles, so the catalog stays empty.
    let scenario = resolve_scenario(&config, &NoiseCatalog::default())
        .unwrap_or_else(|err| panic!("Invalid scenario: {:#}", err));
    let mut rng = SimulationRng::from_seed(config.simulation.seed);
    let trajectory = run_scenario(&scenario, config.simulation.cycles, &mut rng);

    // --- 3. Print ---
    let labels: Vec<String> = lane_state_layout(scenario.builder.state_dim())
        .iter()
        .map(|c| c.label())
        .collect();
    println!("frame  {}  trace(P)", labels.join("  "));
    for record in &trajectory.records {
        let values: Vec<String> = record
            .posterior
            .vector
            .iter()
            .map(|v| format!("{:.6}", v))
            .collect();
        println!(
            "{:>5}  {}  {:.6}",
            record.frame,
            values.join("  "),
            record.posterior.trace()
        );
    }
}
