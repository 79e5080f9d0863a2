use clap::Parser;
use std::path::PathBuf;

/// Lane Sim: replays a lane-tracking scenario through the lane curve Kalman filter.
///
/// This struct defines the command-line arguments of the `lane_sim` binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/reference_ramp.toml")]
    pub scenario: PathBuf,

    /// Directory holding the catalog of named noise profiles.
    #[arg(long, default_value = "assets/catalog")]
    pub catalog: PathBuf,

    /// Override the number of cycles set in the scenario.
    #[arg(short, long)]
    pub cycles: Option<usize>,

    /// Log every predicted and corrected state.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
