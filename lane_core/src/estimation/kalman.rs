// lane_core/src/estimation/kalman.rs

use nalgebra::DMatrix;
use tracing::trace;

use crate::error::{KalmanError, Result};
use crate::state::{symmetrize, GaussianState};
use crate::types::{Control, Measurement};

/// Relative pivot size below which the innovation covariance counts as singular.
pub const DEFAULT_SINGULARITY_TOLERANCE: f64 = 1e-12;

/// A generic discrete-time linear Kalman filter.
///
/// Holds only the model `{A, B, H, Q, R}`. The belief `(x, P)` is always
/// passed in and a new one returned, so one core can serve any number of
/// independent lanes or frames.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearKalmanCore {
    /// State transition matrix `A` (n x n).
    a: DMatrix<f64>,
    /// Control matrix `B` (n x m).
    b: DMatrix<f64>,
    /// Measurement matrix `H` (k x n).
    h: DMatrix<f64>,
    /// Process noise covariance `Q` (n x n).
    q: DMatrix<f64>,
    /// Measurement noise covariance `R` (k x k).
    r: DMatrix<f64>,
    singularity_tolerance: f64,
}

impl LinearKalmanCore {
    /// Creates a new core, checking that all matrices agree on dimensions.
    pub fn new(
        a: DMatrix<f64>,
        b: DMatrix<f64>,
        h: DMatrix<f64>,
        q: DMatrix<f64>,
        r: DMatrix<f64>,
    ) -> Result<Self> {
        let n = a.nrows();
        if a.shape() != (n, n) {
            return Err(KalmanError::shape("transition matrix A", (n, n), a.shape()));
        }
        if b.nrows() != n {
            return Err(KalmanError::shape(
                "control matrix B",
                (n, b.ncols()),
                b.shape(),
            ));
        }
        if h.ncols() != n {
            return Err(KalmanError::shape(
                "measurement matrix H",
                (h.nrows(), n),
                h.shape(),
            ));
        }
        if q.shape() != (n, n) {
            return Err(KalmanError::shape("process noise Q", (n, n), q.shape()));
        }
        let k = h.nrows();
        if r.shape() != (k, k) {
            return Err(KalmanError::shape("measurement noise R", (k, k), r.shape()));
        }

        Ok(Self {
            a,
            b,
            h,
            q,
            r,
            singularity_tolerance: DEFAULT_SINGULARITY_TOLERANCE,
        })
    }

    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    pub fn state_dim(&self) -> usize {
        self.a.nrows()
    }

    pub fn control_dim(&self) -> usize {
        self.b.ncols()
    }

    pub fn measurement_dim(&self) -> usize {
        self.h.nrows()
    }

    pub fn transition(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn control(&self) -> &DMatrix<f64> {
        &self.b
    }

    pub fn measurement(&self) -> &DMatrix<f64> {
        &self.h
    }

    pub fn process_noise(&self) -> &DMatrix<f64> {
        &self.q
    }

    pub fn measurement_noise(&self) -> &DMatrix<f64> {
        &self.r
    }

    /// PURE FUNCTION: Performs one prediction step.
    ///
    /// `x = A*x + B*u`, `P = A*P*A^T + Q`.
    pub fn predict(&self, prior: &GaussianState, u: &Control) -> Result<GaussianState> {
        self.check_state(prior)?;
        if u.len() != self.control_dim() {
            return Err(KalmanError::length(
                "control vector",
                self.control_dim(),
                u.len(),
            ));
        }

        let vector = &self.a * &prior.vector + &self.b * u;
        let covariance = &self.a * &prior.covariance * self.a.transpose() + &self.q;
        trace!(x = ?vector.as_slice(), "predicted state");

        let predicted = GaussianState { vector, covariance };
        if !predicted.is_finite() {
            return Err(KalmanError::NonFinite("predicted state"));
        }
        Ok(predicted)
    }

    /// PURE FUNCTION: Performs one measurement update step.
    ///
    /// Fails with `SingularCovariance` instead of inverting an ill-conditioned
    /// innovation covariance.
    pub fn update(&self, predicted: &GaussianState, z: &Measurement) -> Result<GaussianState> {
        self.check_state(predicted)?;
        if z.len() != self.measurement_dim() {
            return Err(KalmanError::length(
                "measurement vector",
                self.measurement_dim(),
                z.len(),
            ));
        }

        let p_priori = &predicted.covariance;
        let x_priori = &predicted.vector;

        // Innovation and its covariance
        let y = z - &self.h * x_priori;
        let s = &self.h * p_priori * self.h.transpose() + &self.r;

        let k_gain = self.kalman_gain(p_priori, &s)?;

        let n = predicted.dim();
        let vector = x_priori + &k_gain * y;
        let i_kh = DMatrix::<f64>::identity(n, n) - &k_gain * &self.h;
        // (I - KH)P drifts away from symmetric over many cycles.
        let covariance = symmetrize(&(i_kh * p_priori));
        trace!(x = ?vector.as_slice(), "corrected state");

        let corrected = GaussianState { vector, covariance };
        if !corrected.is_finite() {
            return Err(KalmanError::NonFinite("corrected state"));
        }
        Ok(corrected)
    }

    /// Predict followed by update.
    pub fn step(
        &self,
        prior: &GaussianState,
        u: &Control,
        z: &Measurement,
    ) -> Result<GaussianState> {
        let predicted = self.predict(prior, u)?;
        self.update(&predicted, z)
    }

    /// `K = P*H^T*S^-1`, solved rather than inverted.
    fn kalman_gain(&self, p: &DMatrix<f64>, s: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if !s.iter().all(|v| v.is_finite()) {
            return Err(KalmanError::NonFinite("innovation covariance"));
        }

        // LU with partial pivoting; a vanishing pivot means S is not invertible.
        let lu = s.transpose().lu();
        let pivots = lu.u().diagonal();
        let largest = pivots.amax();
        let smallest = pivots.iter().fold(f64::INFINITY, |acc, v| acc.min(v.abs()));
        if largest == 0.0 || smallest <= self.singularity_tolerance * largest {
            return Err(KalmanError::SingularCovariance);
        }

        // S^T * K^T = (P*H^T)^T
        let rhs = (p * self.h.transpose()).transpose();
        let s_is_symmetric = s.relative_eq(&s.transpose(), 1e-12, 1e-9);
        let k_transposed = match s_is_symmetric.then(|| s.clone().cholesky()).flatten() {
            Some(chol) => chol.solve(&rhs),
            None => lu.solve(&rhs).ok_or(KalmanError::SingularCovariance)?,
        };

        Ok(k_transposed.transpose())
    }

    fn check_state(&self, state: &GaussianState) -> Result<()> {
        let n = self.state_dim();
        if state.dim() != n {
            return Err(KalmanError::length("state vector", n, state.dim()));
        }
        if state.covariance.shape() != (n, n) {
            return Err(KalmanError::shape(
                "covariance",
                (n, n),
                state.covariance.shape(),
            ));
        }
        Ok(())
    }
}

/// The filter flavour chosen when a model is configured.
///
/// Both variants carry the linear(ized) matrices. Only `Linear` knows how to
/// run a measurement update; `Extended` is reserved for a nonlinear update and
/// refuses it explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterModel {
    Linear(LinearKalmanCore),
    Extended(LinearKalmanCore),
}

impl FilterModel {
    pub fn core(&self) -> &LinearKalmanCore {
        match self {
            FilterModel::Linear(core) | FilterModel::Extended(core) => core,
        }
    }

    /// Time propagation is shared: `A` doubles as the dynamics Jacobian.
    pub fn predict(&self, prior: &GaussianState, u: &Control) -> Result<GaussianState> {
        self.core().predict(prior, u)
    }

    pub fn update(&self, predicted: &GaussianState, z: &Measurement) -> Result<GaussianState> {
        match self {
            FilterModel::Linear(core) => core.update(predicted, z),
            FilterModel::Extended(_) => self.update_extended(predicted, z),
        }
    }

    /// Nonlinear measurement update. Not available yet.
    pub fn update_extended(
        &self,
        _predicted: &GaussianState,
        _z: &Measurement,
    ) -> Result<GaussianState> {
        Err(KalmanError::ExtendedModelUnsupported)
    }

    pub fn step(
        &self,
        prior: &GaussianState,
        u: &Control,
        z: &Measurement,
    ) -> Result<GaussianState> {
        let predicted = self.predict(prior, u)?;
        self.update(&predicted, z)
    }
}
