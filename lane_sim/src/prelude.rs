// lane_sim/src/prelude.rs

// Re-export the entire lane_core prelude so you can easily access
// pure types like `GaussianState`, `MotionInput`, `LaneStateModelBuilder`, etc.
pub use lane_core::prelude::*;

pub use crate::cli::Cli;

// Re-export common simulation-specific types for easy access in other modules.
pub use crate::simulation::config::structs::*;
pub use crate::simulation::config::{NoiseCatalog, ResolvedScenario};
pub use crate::simulation::core::prng::SimulationRng;
pub use crate::simulation::core::trajectory::{
    FrameOutcome, FrameRecord, Trajectory, TrajectorySummary,
};
pub use crate::simulation::sensors::lane_camera::LaneCamera;
