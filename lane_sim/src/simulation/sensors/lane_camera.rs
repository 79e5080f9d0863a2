// lane_sim/src/simulation/sensors/lane_camera.rs

use anyhow::{ensure, Context, Result};
use nalgebra::DVector;
use rand_distr::{Distribution, Normal};

use crate::simulation::config::structs::MeasurementConfig;
use crate::simulation::core::prng::SimulationRng;

/// A synthetic lane detector.
///
/// The observed lane coefficients follow a linear ramp `base + step * frame`,
/// optionally corrupted by zero-mean Gaussian noise, and every
/// `dropout_every`-th frame yields no detection at all.
#[derive(Debug, Clone)]
pub struct LaneCamera {
    base: DVector<f64>,
    step: DVector<f64>,
    noise_dist: Vec<Normal<f64>>,
    dropout_every: Option<usize>,
}

impl LaneCamera {
    pub fn new(config: &MeasurementConfig, state_dim: usize) -> Result<Self> {
        ensure!(
            config.base.len() == state_dim,
            "measurement.base has {} entries, the lane model has {} terms",
            config.base.len(),
            state_dim
        );
        ensure!(
            config.step.len() == state_dim,
            "measurement.step has {} entries, the lane model has {} terms",
            config.step.len(),
            state_dim
        );
        ensure!(
            config.noise_stddev.is_empty() || config.noise_stddev.len() == state_dim,
            "measurement.noise_stddev must be empty or have {} entries",
            state_dim
        );
        ensure!(
            config.dropout_every != Some(0),
            "measurement.dropout_every must be at least 1"
        );

        let noise_dist = config
            .noise_stddev
            .iter()
            .map(|&std_dev| {
                ensure!(
                    std_dev.is_finite() && std_dev >= 0.0,
                    "measurement.noise_stddev entries must be finite and >= 0, got {}",
                    std_dev
                );
                Normal::new(0.0, std_dev)
                    .with_context(|| format!("invalid measurement noise stddev {}", std_dev))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base: DVector::from_row_slice(&config.base),
            step: DVector::from_row_slice(&config.step),
            noise_dist,
            dropout_every: config.dropout_every,
        })
    }

    /// The noiseless lane coefficients at `frame`.
    pub fn ground_truth(&self, frame: usize) -> DVector<f64> {
        &self.base + &self.step * frame as f64
    }

    /// Whether the detector misses the lane at `frame`.
    pub fn drops(&self, frame: usize) -> bool {
        self.dropout_every
            .is_some_and(|every| (frame + 1) % every == 0)
    }

    /// Produces the measurement `z` for `frame`, or `None` on a dropout.
    pub fn observe(&self, frame: usize, rng: &mut SimulationRng) -> Option<DVector<f64>> {
        if self.drops(frame) {
            return None;
        }

        let mut z = self.ground_truth(frame);
        for (value, dist) in z.iter_mut().zip(&self.noise_dist) {
            *value += dist.sample(&mut rng.0);
        }
        Some(z)
    }
}
