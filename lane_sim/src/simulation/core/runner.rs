// lane_sim/src/simulation/core/runner.rs

use lane_core::prelude::{estimate_lane_state, estimate_lane_state_predict_only, lane_state_layout};
use tracing::{debug, info, warn};

use super::prng::SimulationRng;
use super::trajectory::{FrameOutcome, FrameRecord, Trajectory};
use crate::simulation::config::ResolvedScenario;

/// Runs `cycles` frames of a scenario, threading each posterior into the next
/// frame's prior.
///
/// A failed cycle is logged and skipped: its prior carries over to the next
/// frame untouched.
pub fn run_scenario(
    scenario: &ResolvedScenario,
    cycles: usize,
    rng: &mut SimulationRng,
) -> Trajectory {
    let layout = lane_state_layout(scenario.builder.state_dim());
    let mut state = scenario.prior.clone();
    let mut trajectory = Trajectory::new(state.clone());

    for frame in 0..cycles {
        let measurement = scenario.camera.observe(frame, rng);
        let result = match &measurement {
            Some(z) => estimate_lane_state(&scenario.builder, &state, &scenario.motion, z),
            None => estimate_lane_state_predict_only(&scenario.builder, &state, &scenario.motion),
        };

        let outcome = match result {
            Ok(posterior) => {
                state = posterior;
                if measurement.is_some() {
                    FrameOutcome::Corrected
                } else {
                    FrameOutcome::Predicted
                }
            }
            Err(e) => {
                warn!(frame, error = %e, "Lane filter cycle failed, keeping the prior");
                FrameOutcome::Failed(e)
            }
        };

        if let Some(z) = &measurement {
            debug!(frame, z = ?z.as_slice(), "lane measurement");
        }
        let coefficients = layout
            .iter()
            .zip(state.vector.iter())
            .map(|(coefficient, value)| format!("{}={:.6}", coefficient.label(), value))
            .collect::<Vec<_>>()
            .join(" ");
        info!(frame, outcome = ?outcome, "{}", coefficients);

        trajectory.push(FrameRecord {
            frame,
            measurement,
            posterior: state.clone(),
            outcome,
        });
    }

    trajectory
}
