// lane_sim/src/main.rs

use anyhow::Result;
use clap::Parser;
use lane_sim::prelude::*;
use lane_sim::simulation::config::{load_catalog_from_disk, load_scenario, resolve_scenario};
use lane_sim::simulation::core::runner::run_scenario;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose.
    let default_filter = if cli.verbose {
        "lane_sim=debug,lane_core=debug"
    } else {
        "lane_sim=info,lane_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = load_scenario(&cli.scenario)?;
    let catalog = load_catalog_from_disk(&cli.catalog);
    let scenario = resolve_scenario(&config, &catalog)?;
    let cycles = cli.cycles.unwrap_or(config.simulation.cycles);

    info!(
        cycles,
        state_dim = scenario.builder.state_dim(),
        filter = ?scenario.builder.config().filter,
        "Starting lane filter run"
    );

    let mut rng = SimulationRng::from_seed(config.simulation.seed);
    let trajectory = run_scenario(&scenario, cycles, &mut rng);

    let summary = trajectory.summary();
    let final_state = trajectory.final_state();
    info!(
        frames = summary.frames,
        corrected = summary.corrected,
        predicted = summary.predicted,
        failed = summary.failed,
        mean_offset_residual = ?summary.mean_offset_residual,
        final_trace = final_state.trace(),
        "Run finished"
    );
    info!("Final lane state: {:?}", final_state.vector.as_slice());
    info!(
        "Final covariance diagonal: {:?}",
        final_state.covariance.diagonal().as_slice()
    );

    Ok(())
}
