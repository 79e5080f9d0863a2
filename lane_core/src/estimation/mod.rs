// lane_core/src/estimation/mod.rs

//! Filtering algorithms. Everything in here is a pure function of its inputs:
//! the caller owns the belief `(x, P)` and threads it from cycle to cycle.

pub mod kalman;
pub mod lane;

pub use kalman::{FilterModel, LinearKalmanCore, DEFAULT_SINGULARITY_TOLERANCE};
pub use lane::{
    estimate_lane_parameters, estimate_lane_parameters_predict_only, estimate_lane_state,
    estimate_lane_state_predict_only,
};
