// lane_sim/src/simulation/config/mod.rs

//! This module handles loading, resolving, and validating all scenario
//! configuration from disk, including the noise catalog.

mod catalog;
mod resolver;

pub mod structs;

use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::info;

// Re-export public types
pub use catalog::{load_catalog_from_disk, NoiseCatalog};
pub use resolver::{resolve_scenario, ResolvedScenario};
pub use structs::ScenarioConfig;

/// Prefix of environment variables overriding scenario values,
/// e.g. `LANE_MOTION__SPEED=5.0`.
pub const ENV_PREFIX: &str = "LANE_";

/// Top-level scenario sections an environment variable may override. Other
/// `LANE_*` variables are ignored.
const SCENARIO_SECTIONS: [&str; 5] = ["simulation", "prior", "motion", "measurement", "model"];

fn scenario_env() -> Env {
    Env::prefixed(ENV_PREFIX).split("__").filter(|key| {
        key.as_str().split('.').next().is_some_and(|section| {
            SCENARIO_SECTIONS
                .iter()
                .any(|known| section.eq_ignore_ascii_case(known))
        })
    })
}

/// Loads a scenario file, layering `LANE_*` environment overrides on top.
pub fn load_scenario(scenario_path: &Path) -> Result<ScenarioConfig> {
    if !scenario_path.exists() {
        bail!("Scenario file not found at {:?}", scenario_path);
    }
    info!("Loading scenario from: {:?}", scenario_path);

    Figment::new()
        .merge(Toml::file(scenario_path))
        .merge(scenario_env())
        .extract()
        .with_context(|| format!("Failed to load or parse scenario file at {:?}", scenario_path))
}

/// Parses a scenario from TOML text, without environment overrides.
pub fn parse_scenario(toml: &str) -> Result<ScenarioConfig> {
    Figment::new()
        .merge(Toml::string(toml))
        .extract()
        .context("Failed to parse scenario")
}
