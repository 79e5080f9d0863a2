// lane_sim/src/simulation/core/trajectory.rs

use lane_core::prelude::{GaussianState, KalmanError};
use nalgebra::DVector;

/// What happened to the belief in one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Predicted and corrected with a measurement.
    Corrected,
    /// No measurement; predicted only.
    Predicted,
    /// The cycle failed and the prior was carried over unchanged.
    Failed(KalmanError),
}

/// One frame of a run.
#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub frame: usize,
    pub measurement: Option<DVector<f64>>,
    /// The belief after this frame (the prior again if the cycle failed).
    pub posterior: GaussianState,
    pub outcome: FrameOutcome,
}

/// The sequence of beliefs produced by a run, starting from the prior.
#[derive(Debug, Clone)]
pub struct Trajectory {
    pub initial: GaussianState,
    pub records: Vec<FrameRecord>,
}

/// Aggregate numbers logged at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySummary {
    pub frames: usize,
    pub corrected: usize,
    pub predicted: usize,
    pub failed: usize,
    /// Mean `|c0_posterior - c0_measured|` over corrected frames.
    pub mean_offset_residual: Option<f64>,
}

impl Trajectory {
    pub fn new(initial: GaussianState) -> Self {
        Self {
            initial,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: FrameRecord) {
        self.records.push(record);
    }

    /// The most recent belief.
    pub fn final_state(&self) -> &GaussianState {
        self.records
            .last()
            .map(|record| &record.posterior)
            .unwrap_or(&self.initial)
    }

    pub fn summary(&self) -> TrajectorySummary {
        let count = |wanted: fn(&FrameOutcome) -> bool| {
            self.records.iter().filter(|r| wanted(&r.outcome)).count()
        };

        let residuals: Vec<f64> = self
            .records
            .iter()
            .filter(|r| r.outcome == FrameOutcome::Corrected)
            .filter_map(|r| {
                r.measurement
                    .as_ref()
                    .map(|z| (r.posterior.vector[0] - z[0]).abs())
            })
            .collect();

        TrajectorySummary {
            frames: self.records.len(),
            corrected: count(|o| matches!(o, FrameOutcome::Corrected)),
            predicted: count(|o| matches!(o, FrameOutcome::Predicted)),
            failed: count(|o| matches!(o, FrameOutcome::Failed(_))),
            mean_offset_residual: (!residuals.is_empty())
                .then(|| residuals.iter().sum::<f64>() / residuals.len() as f64),
        }
    }
}
