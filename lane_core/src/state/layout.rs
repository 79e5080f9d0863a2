// lane_core/src/state/layout.rs
use crate::state::LaneCoefficient;

/// The state dimension of the classic cubic lane model `[c0, c1, c2, c3]`.
pub const CUBIC_LANE_STATE_DIM: usize = 4;

/// Returns the state vector layout of a polynomial lane model with `dim` terms.
///
/// The state is composed of:
/// - Offset (c0), index 0
/// - Heading (c1), index 1
/// - Curvature (c2), index 2
/// - Curvature rate (c3), index 3
/// - Higher-order terms, if any
pub fn lane_state_layout(dim: usize) -> Vec<LaneCoefficient> {
    (0..dim).map(LaneCoefficient::from_index).collect()
}
