// lane_core/src/models/lane/mod.rs

//! The polynomial lane curve model: configuration, per-cycle motion input and
//! the builder that turns both into a Kalman model.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{KalmanError, Result};
use crate::types::Control;

mod builder;
mod config;
pub mod matrices;

pub use builder::{LaneCycle, LaneStateModelBuilder};
pub use config::{
    FilterKind, LaneModelConfig, NoiseConfig, DEFAULT_MEASUREMENT_NOISE, DEFAULT_PROCESS_NOISE,
};

/// Ego-motion driving one prediction step.
///
/// Kept apart from the measurement so the same motion can be reused when a
/// frame arrives without a lane observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionInput {
    /// Vehicle speed in m/s. Must be non-zero.
    pub speed: f64,
    /// Time horizon in seconds the lane curve is propagated over. Zero means
    /// "no relative motion".
    pub look_ahead_time: f64,
    /// Yaw-rate-like control input `w`.
    pub yaw_rate: f64,
}

impl MotionInput {
    pub fn new(speed: f64, look_ahead_time: f64, yaw_rate: f64) -> Result<Self> {
        let motion = Self {
            speed,
            look_ahead_time,
            yaw_rate,
        };
        motion.validate()?;
        Ok(motion)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed == 0.0 {
            return Err(KalmanError::InvalidSpeed(self.speed));
        }
        if !self.look_ahead_time.is_finite() || self.look_ahead_time < 0.0 {
            return Err(KalmanError::InvalidLookAhead(self.look_ahead_time));
        }
        Ok(())
    }

    /// `dx = speed * look_ahead_time`.
    pub fn look_ahead_distance(&self) -> f64 {
        self.speed * self.look_ahead_time
    }

    /// The control vector `u = [w]`.
    pub fn control_vector(&self) -> Control {
        DVector::from_element(1, self.yaw_rate)
    }
}
