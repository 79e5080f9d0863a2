// lane_core/src/models/lane/builder.rs

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::config::{FilterKind, LaneModelConfig};
use super::matrices::{control_matrix, measurement_matrix, transition_matrix};
use super::MotionInput;
use crate::error::{KalmanError, Result};
use crate::estimation::kalman::{FilterModel, LinearKalmanCore};
use crate::state::GaussianState;

/// Turns lane-domain inputs into a fully specified linear state-space model
/// and drives one filter cycle with it.
#[derive(Debug, Clone)]
pub struct LaneStateModelBuilder {
    config: LaneModelConfig,
}

impl LaneStateModelBuilder {
    /// Creates a builder, validating the dimension and noise configuration once.
    pub fn new(config: LaneModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LaneModelConfig {
        &self.config
    }

    pub fn state_dim(&self) -> usize {
        self.config.state_dim
    }

    /// Builds `A, B, H, Q, R` for one motion input and wraps them in the
    /// configured filter variant.
    pub fn build_model(&self, motion: &MotionInput) -> Result<FilterModel> {
        motion.validate()?;
        let n = self.config.state_dim;
        let dx = motion.look_ahead_distance();

        let core = LinearKalmanCore::new(
            transition_matrix(n, dx),
            control_matrix(n, motion),
            measurement_matrix(n),
            self.config.noise.process_noise(),
            self.config.noise.measurement_noise(),
        )?
        .with_singularity_tolerance(self.config.singularity_tolerance);

        Ok(match self.config.filter {
            FilterKind::Linear => FilterModel::Linear(core),
            FilterKind::Extended => FilterModel::Extended(core),
        })
    }

    /// Stores the inputs of one predict + update cycle.
    pub fn configure(
        &self,
        x: DVector<f64>,
        speed: f64,
        look_ahead_time: f64,
        control_w: f64,
        z: DVector<f64>,
    ) -> Result<LaneCycle<'_>> {
        let motion = MotionInput::new(speed, look_ahead_time, control_w)?;
        self.configure_motion(x, motion)?.with_measurement(z)
    }

    /// Stores the inputs of a cycle whose measurement may be missing.
    pub fn configure_motion(&self, x: DVector<f64>, motion: MotionInput) -> Result<LaneCycle<'_>> {
        motion.validate()?;
        if x.len() != self.state_dim() {
            return Err(KalmanError::length("state vector", self.state_dim(), x.len()));
        }
        Ok(LaneCycle {
            builder: self,
            x,
            motion,
            z: None,
        })
    }
}

/// The validated inputs of a single cycle, ready to run against a covariance.
#[derive(Debug, Clone)]
pub struct LaneCycle<'a> {
    builder: &'a LaneStateModelBuilder,
    x: DVector<f64>,
    motion: MotionInput,
    z: Option<DVector<f64>>,
}

impl LaneCycle<'_> {
    /// Attaches the lane observation `z` for this cycle.
    pub fn with_measurement(mut self, z: DVector<f64>) -> Result<Self> {
        let n = self.builder.state_dim();
        if z.len() != n {
            return Err(KalmanError::length("measurement vector", n, z.len()));
        }
        self.z = Some(z);
        Ok(self)
    }

    pub fn motion(&self) -> &MotionInput {
        &self.motion
    }

    pub fn has_measurement(&self) -> bool {
        self.z.is_some()
    }

    /// Runs predict, then update if a measurement was attached, and returns the
    /// posterior `(x, P)`.
    pub fn run(&self, p: &DMatrix<f64>) -> Result<(DVector<f64>, DMatrix<f64>)> {
        let posterior = self.run_state(p)?;
        Ok((posterior.vector, posterior.covariance))
    }

    /// Runs the prediction only, ignoring any attached measurement.
    pub fn run_predict_only(&self, p: &DMatrix<f64>) -> Result<(DVector<f64>, DMatrix<f64>)> {
        let model = self.builder.build_model(&self.motion)?;
        let predicted = model.predict(&self.prior(p)?, &self.motion.control_vector())?;
        Ok((predicted.vector, predicted.covariance))
    }

    pub(crate) fn run_state(&self, p: &DMatrix<f64>) -> Result<GaussianState> {
        let model = self.builder.build_model(&self.motion)?;
        let prior = self.prior(p)?;
        debug!(
            dx = self.motion.look_ahead_distance(),
            speed = self.motion.speed,
            measured = self.z.is_some(),
            "running lane filter cycle"
        );

        let predicted = model.predict(&prior, &self.motion.control_vector())?;
        match &self.z {
            Some(z) => model.update(&predicted, z),
            None => Ok(predicted),
        }
    }

    fn prior(&self, p: &DMatrix<f64>) -> Result<GaussianState> {
        GaussianState::new(self.x.clone(), p.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lane::NoiseConfig;
    use approx::assert_abs_diff_eq;

    fn reference_builder() -> LaneStateModelBuilder {
        LaneStateModelBuilder::new(LaneModelConfig::default()).unwrap()
    }

    fn x0() -> DVector<f64> {
        DVector::from_row_slice(&[1.8, 0.1, 0.001, 1e-6])
    }

    fn z0() -> DVector<f64> {
        DVector::from_row_slice(&[1.95, 0.13, 0.006, 1e-6])
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = LaneModelConfig {
            noise: NoiseConfig::uniform(3, 0.001, 0.1),
            ..Default::default()
        };
        assert!(matches!(
            LaneStateModelBuilder::new(config),
            Err(KalmanError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_configure_rejects_zero_speed() {
        let builder = reference_builder();
        let err = builder.configure(x0(), 0.0, 0.5, 0.0, z0()).unwrap_err();
        assert_eq!(err, KalmanError::InvalidSpeed(0.0));
    }

    #[test]
    fn test_configure_rejects_wrong_lengths() {
        let builder = reference_builder();

        let err = builder
            .configure(DVector::zeros(3), 3.6, 0.5, 0.0, z0())
            .unwrap_err();
        assert_eq!(err, KalmanError::length("state vector", 4, 3));

        let err = builder
            .configure(x0(), 3.6, 0.5, 0.0, DVector::zeros(5))
            .unwrap_err();
        assert_eq!(err, KalmanError::length("measurement vector", 4, 5));
    }

    #[test]
    fn test_run_rejects_wrong_covariance_shape() {
        let builder = reference_builder();
        let cycle = builder.configure(x0(), 3.6, 0.5, 0.0, z0()).unwrap();
        let err = cycle.run(&DMatrix::identity(3, 3)).unwrap_err();
        assert_eq!(err, KalmanError::shape("covariance", (4, 4), (3, 3)));
    }

    #[test]
    fn test_build_model_uses_configured_noise() {
        let config = LaneModelConfig {
            noise: NoiseConfig {
                process: vec![1e-3, 2e-3, 3e-3, 4e-3],
                measurement: vec![0.5, 0.25, 0.125, 0.0625],
            },
            ..Default::default()
        };
        let builder = LaneStateModelBuilder::new(config).unwrap();
        let model = builder
            .build_model(&MotionInput::new(3.6, 0.5, 0.0).unwrap())
            .unwrap();

        let core = model.core();
        assert_eq!(core.process_noise()[(3, 3)], 4e-3);
        assert_eq!(core.measurement_noise()[(1, 1)], 0.25);
        assert_eq!(core.measurement(), &DMatrix::identity(4, 4));
        assert_abs_diff_eq!(core.transition()[(0, 1)], 1.8, epsilon = 1e-12);
    }

    #[test]
    fn test_first_reference_cycle() {
        let builder = reference_builder();
        let cycle = builder.configure(x0(), 3.6, 0.5, 0.0, z0()).unwrap();
        let (x, p) = cycle.run(&(DMatrix::identity(4, 4) * 0.001)).unwrap();

        assert_abs_diff_eq!(x[0], 1.980_802_2, epsilon = 1e-6);
        assert_abs_diff_eq!(x[1], 0.102_254_4, epsilon = 1e-6);
        assert_abs_diff_eq!(x[2], 0.001_503_89, epsilon = 1e-7);
        assert_abs_diff_eq!(x[3], 0.000_227_482, epsilon = 1e-8);
        assert_eq!(p, p.transpose());
    }

    #[test]
    fn test_zero_look_ahead_prediction_keeps_state() {
        let builder = reference_builder();
        let cycle = builder
            .configure_motion(x0(), MotionInput::new(3.6, 0.0, 0.0).unwrap())
            .unwrap();
        let p0 = DMatrix::identity(4, 4) * 0.001;

        let (x, p) = cycle.run_predict_only(&p0).unwrap();

        assert_eq!(x, x0());
        assert_abs_diff_eq!(p, p0 + DMatrix::identity(4, 4) * 0.001, epsilon = 1e-15);
    }

    #[test]
    fn test_missing_measurement_runs_prediction_only() {
        let builder = reference_builder();
        let motion = MotionInput::new(3.6, 0.5, 0.0).unwrap();
        let p0 = DMatrix::identity(4, 4) * 0.001;

        let without = builder.configure_motion(x0(), motion).unwrap();
        assert!(!without.has_measurement());
        let with = without.clone().with_measurement(z0()).unwrap();

        assert_eq!(without.run(&p0).unwrap(), with.run_predict_only(&p0).unwrap());
        assert!(with.run(&p0).unwrap().1.trace() < without.run(&p0).unwrap().1.trace());
    }

    #[test]
    fn test_extended_model_fails_the_update() {
        let builder = LaneStateModelBuilder::new(LaneModelConfig {
            filter: FilterKind::Extended,
            ..Default::default()
        })
        .unwrap();
        let cycle = builder.configure(x0(), 3.6, 0.5, 0.0, z0()).unwrap();
        let p0 = DMatrix::identity(4, 4) * 0.001;

        assert_eq!(
            cycle.run(&p0).unwrap_err(),
            KalmanError::ExtendedModelUnsupported
        );
        assert!(cycle.run_predict_only(&p0).is_ok());
    }

    #[test]
    fn test_yaw_rate_bends_offset_and_heading() {
        let builder = reference_builder();
        let p0 = DMatrix::identity(4, 4) * 0.001;
        let straight = builder
            .configure_motion(x0(), MotionInput::new(3.6, 0.5, 0.0).unwrap())
            .unwrap()
            .run(&p0)
            .unwrap();
        let turning = builder
            .configure_motion(x0(), MotionInput::new(3.6, 0.5, 0.1).unwrap())
            .unwrap()
            .run(&p0)
            .unwrap();

        // B = [-0.45, -0.5, 0, 0]
        assert_abs_diff_eq!(turning.0[0] - straight.0[0], -0.045, epsilon = 1e-12);
        assert_abs_diff_eq!(turning.0[1] - straight.0[1], -0.05, epsilon = 1e-12);
        assert_eq!(turning.0[2], straight.0[2]);
    }
}
