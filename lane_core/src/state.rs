// lane_core/src/state.rs

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{KalmanError, Result};
use crate::types::{Covariance, State};

pub mod layout;

/// Names one entry of a polynomial lane state vector.
///
/// Index `k` holds the k-th derivative of the lane curve at the vehicle, so the
/// first four are the classic cubic lane parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneCoefficient {
    /// c0, lateral offset of the lane line from the vehicle.
    Offset,
    /// c1, heading of the lane line relative to the vehicle.
    Heading,
    /// c2, curvature.
    Curvature,
    /// c3, rate of change of curvature.
    CurvatureRate,
    /// Any coefficient beyond the cubic model, by index.
    Higher(usize),
}

impl LaneCoefficient {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => LaneCoefficient::Offset,
            1 => LaneCoefficient::Heading,
            2 => LaneCoefficient::Curvature,
            3 => LaneCoefficient::CurvatureRate,
            k => LaneCoefficient::Higher(k),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            LaneCoefficient::Offset => 0,
            LaneCoefficient::Heading => 1,
            LaneCoefficient::Curvature => 2,
            LaneCoefficient::CurvatureRate => 3,
            LaneCoefficient::Higher(k) => *k,
        }
    }

    /// Short label used in logs, e.g. `c0`.
    pub fn label(&self) -> String {
        format!("c{}", self.index())
    }
}

/// A Gaussian belief over the state: the mean `x` and its covariance `P`.
///
/// The filter never keeps one of these between cycles. The caller owns it,
/// hands it to a cycle by reference and gets a fresh posterior back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianState {
    /// The state vector `x`.
    pub vector: State,
    /// The covariance matrix `P`.
    pub covariance: Covariance,
}

impl GaussianState {
    /// Pairs a state vector with its covariance, checking that `P` is `n x n`.
    pub fn new(vector: State, covariance: Covariance) -> Result<Self> {
        let state = Self { vector, covariance };
        state.check_shape()?;
        Ok(state)
    }

    /// Builds a prior with a diagonal covariance, the usual way to start a filter.
    pub fn from_diagonal(vector: State, variances: &DVector<f64>) -> Result<Self> {
        if variances.len() != vector.len() {
            return Err(KalmanError::length(
                "covariance diagonal",
                vector.len(),
                variances.len(),
            ));
        }
        Ok(Self {
            vector,
            covariance: DMatrix::from_diagonal(variances),
        })
    }

    /// Returns the dimension (number of rows) of the state vector.
    pub fn dim(&self) -> usize {
        self.vector.len()
    }

    /// Checks that the covariance is square and matches the state vector.
    pub fn check_shape(&self) -> Result<()> {
        let n = self.dim();
        if self.covariance.shape() != (n, n) {
            return Err(KalmanError::shape(
                "covariance",
                (n, n),
                self.covariance.shape(),
            ));
        }
        Ok(())
    }

    /// Sum of the variances.
    pub fn trace(&self) -> f64 {
        self.covariance.trace()
    }

    /// Looks up one coefficient of the state vector.
    pub fn coefficient(&self, coefficient: LaneCoefficient) -> Option<f64> {
        self.vector.get(coefficient.index()).copied()
    }

    pub fn is_finite(&self) -> bool {
        self.vector.iter().all(|v| v.is_finite()) && self.covariance.iter().all(|v| v.is_finite())
    }
}

/// Forces a covariance matrix to be exactly symmetric: `(P + P^T) / 2`.
pub fn symmetrize(covariance: &DMatrix<f64>) -> DMatrix<f64> {
    (covariance + covariance.transpose()) * 0.5
}
