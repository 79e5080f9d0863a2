// lane_core/src/models/lane/config.rs

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{KalmanError, Result};
use crate::estimation::kalman::DEFAULT_SINGULARITY_TOLERANCE;
use crate::state::layout::CUBIC_LANE_STATE_DIM;

/// Process noise used by the reference lane tracker, per state term.
pub const DEFAULT_PROCESS_NOISE: f64 = 0.001;
/// Measurement noise used by the reference lane tracker, per observed term.
pub const DEFAULT_MEASUREMENT_NOISE: f64 = 0.1;

/// Which filter variant a lane model is run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    Linear,
    /// Nonlinear measurement update. Selectable, but updates fail until implemented.
    Extended,
}

/// Diagonal noise magnitudes, one entry per state (Q) or measurement (R) term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseConfig {
    /// Diagonal of the process noise covariance `Q`.
    pub process: Vec<f64>,
    /// Diagonal of the measurement noise covariance `R`.
    pub measurement: Vec<f64>,
}

impl NoiseConfig {
    /// Same variance on every term.
    pub fn uniform(dim: usize, process: f64, measurement: f64) -> Self {
        Self {
            process: vec![process; dim],
            measurement: vec![measurement; dim],
        }
    }

    /// Checks both diagonals have `dim` strictly positive, finite entries.
    pub fn validate(&self, dim: usize) -> Result<()> {
        check_diagonal("process", "process noise diagonal", &self.process, dim)?;
        check_diagonal(
            "measurement",
            "measurement noise diagonal",
            &self.measurement,
            dim,
        )
    }

    /// Returns the process noise covariance matrix `Q`.
    pub fn process_noise(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&DVector::from_row_slice(&self.process))
    }

    /// Returns the measurement noise covariance matrix `R`.
    pub fn measurement_noise(&self) -> DMatrix<f64> {
        DMatrix::from_diagonal(&DVector::from_row_slice(&self.measurement))
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::uniform(
            CUBIC_LANE_STATE_DIM,
            DEFAULT_PROCESS_NOISE,
            DEFAULT_MEASUREMENT_NOISE,
        )
    }
}

fn check_diagonal(
    what: &'static str,
    label: &'static str,
    diagonal: &[f64],
    dim: usize,
) -> Result<()> {
    if diagonal.len() != dim {
        return Err(KalmanError::length(label, dim, diagonal.len()));
    }
    match diagonal
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v > 0.0))
    {
        Some((index, &value)) => Err(KalmanError::InvalidNoise { what, index, value }),
        None => Ok(()),
    }
}

/// Everything that shapes the lane state-space model, apart from per-cycle inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LaneModelConfig {
    /// Number of polynomial terms in the state (4 for the cubic lane model).
    pub state_dim: usize,
    pub noise: NoiseConfig,
    pub filter: FilterKind,
    /// Relative pivot size below which `S` is treated as singular.
    pub singularity_tolerance: f64,
}

impl LaneModelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.state_dim < 2 {
            return Err(KalmanError::InvalidStateDimension(self.state_dim));
        }
        if !(self.singularity_tolerance.is_finite() && self.singularity_tolerance >= 0.0) {
            return Err(KalmanError::InvalidTolerance(self.singularity_tolerance));
        }
        self.noise.validate(self.state_dim)
    }
}

impl Default for LaneModelConfig {
    fn default() -> Self {
        Self {
            state_dim: CUBIC_LANE_STATE_DIM,
            noise: NoiseConfig::default(),
            filter: FilterKind::Linear,
            singularity_tolerance: DEFAULT_SINGULARITY_TOLERANCE,
        }
    }
}
