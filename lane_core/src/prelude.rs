// lane_core/src/prelude.rs

// --- Core Data Structures ---
pub use crate::error::KalmanError;
pub use crate::state::layout::{lane_state_layout, CUBIC_LANE_STATE_DIM};
pub use crate::state::{GaussianState, LaneCoefficient};
pub use crate::types::{Control, Covariance, Measurement, State};

// --- Estimation Algorithms ---
pub use crate::estimation::kalman::{FilterModel, LinearKalmanCore};
pub use crate::estimation::lane::{
    estimate_lane_parameters, estimate_lane_parameters_predict_only, estimate_lane_state,
    estimate_lane_state_predict_only,
};

// --- Lane Model ---
pub use crate::models::lane::{
    FilterKind, LaneCycle, LaneModelConfig, LaneStateModelBuilder, MotionInput, NoiseConfig,
};
