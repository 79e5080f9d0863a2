// lane_sim/src/simulation/config/structs.rs

use lane_core::prelude::{FilterKind, NoiseConfig};
use lane_core::estimation::DEFAULT_SINGULARITY_TOLERANCE;
use serde::Deserialize;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # ScenarioConfig
/// The root of the data parsed from a `scenario.toml` file.
/// Every section is optional; missing ones fall back to the reference
/// lane-tracking run (cubic model, 3.6 m/s, 0.5 s look-ahead, 10 cycles).
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: Simulation,

    #[serde(default)]
    pub prior: PriorConfig,

    #[serde(default)]
    pub motion: MotionConfig,

    #[serde(default)]
    pub measurement: MeasurementConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in your scenario.toml file.
// =========================================================================

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Simulation {
    /// Optional seed for the pseudo-random number generator for determinism.
    pub seed: Option<u64>,
    /// Number of filter cycles (frames) to run.
    #[serde(default = "default_cycles")]
    pub cycles: usize,
}

fn default_cycles() -> usize {
    10
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            seed: None,
            cycles: default_cycles(),
        }
    }
}

/// The belief the filter starts from.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PriorConfig {
    /// Initial `[c0, c1, c2, c3, ...]`.
    pub state: Vec<f64>,
    /// Diagonal of the initial covariance `P0`.
    pub covariance_diagonal: Vec<f64>,
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            state: vec![1.8, 0.1, 0.001, 1e-6],
            covariance_diagonal: vec![0.001; 4],
        }
    }
}

/// Ego-motion, held constant for the whole run.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MotionConfig {
    /// Vehicle speed in m/s.
    pub speed: f64,
    /// Look-ahead time in seconds.
    pub look_ahead_time: f64,
    #[serde(default)]
    pub yaw_rate: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 3.6,
            look_ahead_time: 0.5,
            yaw_rate: 0.0,
        }
    }
}

/// The synthetic lane detector feeding the filter.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MeasurementConfig {
    /// Observed coefficients at frame 0.
    pub base: Vec<f64>,
    /// Per-frame increment of the observed coefficients.
    pub step: Vec<f64>,
    /// Standard deviation of the Gaussian noise added per coefficient. Empty means none.
    #[serde(default)]
    pub noise_stddev: Vec<f64>,
    /// Drop every n-th measurement, running a predict-only cycle instead.
    #[serde(default)]
    pub dropout_every: Option<usize>,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            base: vec![1.95, 0.13, 0.006, 1e-6],
            step: vec![0.3, 0.01, 0.001, 0.0],
            noise_stddev: Vec::new(),
            dropout_every: None,
        }
    }
}

/// Filter model settings. `noise` wins over `noise_profile` when both are set.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    #[serde(default = "default_state_dim")]
    pub state_dim: usize,
    #[serde(default)]
    pub filter: FilterKind,
    /// Catalog key of a noise profile, e.g. `"noise.reference"`.
    pub noise_profile: Option<String>,
    /// Inline noise diagonals.
    pub noise: Option<NoiseConfig>,
    #[serde(default = "default_singularity_tolerance")]
    pub singularity_tolerance: f64,
}

fn default_state_dim() -> usize {
    4
}

fn default_singularity_tolerance() -> f64 {
    DEFAULT_SINGULARITY_TOLERANCE
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            state_dim: default_state_dim(),
            filter: FilterKind::Linear,
            noise_profile: None,
            noise: None,
            singularity_tolerance: default_singularity_tolerance(),
        }
    }
}
