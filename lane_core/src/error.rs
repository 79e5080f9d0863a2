// lane_core/src/error.rs

//! Error taxonomy for the filtering core.

use thiserror::Error;

/// Everything that can make a filter cycle fail.
///
/// Every variant is raised synchronously, before any posterior is produced, so
/// the caller's prior is never touched by a failed cycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KalmanError {
    /// A matrix or vector disagrees with the state dimension of the cycle.
    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: String,
        actual: String,
    },

    /// Speed is zero or not finite, so the control matrix is undefined.
    #[error("Invalid speed: {0} (must be finite and non-zero)")]
    InvalidSpeed(f64),

    /// Look-ahead time is negative or not finite.
    #[error("Invalid look-ahead time: {0} (must be finite and >= 0)")]
    InvalidLookAhead(f64),

    /// The innovation covariance `S` cannot be inverted within tolerance.
    #[error("Innovation covariance is singular")]
    SingularCovariance,

    /// An update was routed through the extended (nonlinear) model.
    #[error("Extended (nonlinear) measurement update is not supported")]
    ExtendedModelUnsupported,

    /// A process or measurement noise entry is not strictly positive.
    #[error("Invalid {what} noise at index {index}: {value} (must be finite and > 0)")]
    InvalidNoise {
        what: &'static str,
        index: usize,
        value: f64,
    },

    /// The lane model needs at least an offset and a heading term.
    #[error("Invalid state dimension: {0} (lane model needs at least 2)")]
    InvalidStateDimension(usize),

    /// The singularity tolerance is negative or not finite.
    #[error("Invalid singularity tolerance: {0} (must be finite and >= 0)")]
    InvalidTolerance(f64),

    /// A cycle produced NaN or Inf values.
    #[error("Non-finite values in {0}")]
    NonFinite(&'static str),
}

impl KalmanError {
    /// Builds a `DimensionMismatch` for a vector length.
    pub fn length(what: &'static str, expected: usize, actual: usize) -> Self {
        KalmanError::DimensionMismatch {
            what,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Builds a `DimensionMismatch` for a matrix shape.
    pub fn shape(what: &'static str, expected: (usize, usize), actual: (usize, usize)) -> Self {
        KalmanError::DimensionMismatch {
            what,
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }
}

pub type Result<T> = std::result::Result<T, KalmanError>;
