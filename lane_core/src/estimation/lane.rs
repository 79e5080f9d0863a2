// lane_core/src/estimation/lane.rs

use crate::error::Result;
use crate::models::lane::{LaneModelConfig, LaneStateModelBuilder, MotionInput};
use crate::state::GaussianState;
use crate::types::{Covariance, Measurement, State};

/// PURE FUNCTION: Runs one lane estimation cycle from raw inputs.
///
/// Builds the lane model from `config`, predicts with the given ego-motion and
/// corrects with `z`. Returns the posterior `(x, P)` the caller threads into
/// the next cycle. A `prior_p` of the wrong shape fails with `DimensionMismatch`.
pub fn estimate_lane_parameters(
    prior_x: &State,
    prior_p: &Covariance,
    speed: f64,
    look_ahead_time: f64,
    control_w: f64,
    z: &Measurement,
    config: &LaneModelConfig,
) -> Result<(State, Covariance)> {
    LaneStateModelBuilder::new(config.clone())?
        .configure(prior_x.clone(), speed, look_ahead_time, control_w, z.clone())?
        .run(prior_p)
}

/// PURE FUNCTION: Propagates `(x, P)` for a frame without a lane observation.
pub fn estimate_lane_parameters_predict_only(
    prior_x: &State,
    prior_p: &Covariance,
    speed: f64,
    look_ahead_time: f64,
    control_w: f64,
    config: &LaneModelConfig,
) -> Result<(State, Covariance)> {
    let motion = MotionInput::new(speed, look_ahead_time, control_w)?;
    LaneStateModelBuilder::new(config.clone())?
        .configure_motion(prior_x.clone(), motion)?
        .run_predict_only(prior_p)
}

/// PURE FUNCTION: One cycle (predict, then update with `z`) with an already
/// validated builder and motion.
///
/// The prior is only borrowed, so on `Err` the caller still holds the exact
/// belief it passed in and may retry or skip the frame.
pub fn estimate_lane_state(
    builder: &LaneStateModelBuilder,
    prior: &GaussianState,
    motion: &MotionInput,
    z: &Measurement,
) -> Result<GaussianState> {
    builder
        .configure_motion(prior.vector.clone(), *motion)?
        .with_measurement(z.clone())?
        .run_state(&prior.covariance)
}

/// PURE FUNCTION: Predict-only counterpart of [`estimate_lane_state`].
pub fn estimate_lane_state_predict_only(
    builder: &LaneStateModelBuilder,
    prior: &GaussianState,
    motion: &MotionInput,
) -> Result<GaussianState> {
    builder
        .configure_motion(prior.vector.clone(), *motion)?
        .run_state(&prior.covariance)
}
