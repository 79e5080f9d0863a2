// lane_sim/src/simulation/config/resolver.rs

use anyhow::{anyhow, Context, Result};
use lane_core::prelude::{
    GaussianState, LaneModelConfig, LaneStateModelBuilder, MotionInput, NoiseConfig,
};
use lane_core::models::lane::{DEFAULT_MEASUREMENT_NOISE, DEFAULT_PROCESS_NOISE};
use nalgebra::DVector;

use super::catalog::NoiseCatalog;
use super::structs::{ModelConfig, ScenarioConfig};
use crate::simulation::sensors::lane_camera::LaneCamera;

/// A scenario with every reference resolved and every value validated,
/// ready to be run.
#[derive(Debug, Clone)]
pub struct ResolvedScenario {
    pub builder: LaneStateModelBuilder,
    pub prior: GaussianState,
    pub motion: MotionInput,
    pub camera: LaneCamera,
}

// The main public entry point.
pub fn resolve_scenario(config: &ScenarioConfig, catalog: &NoiseCatalog) -> Result<ResolvedScenario> {
    let model = resolve_model(&config.model, catalog)?;
    let builder = LaneStateModelBuilder::new(model).context("Invalid [model] section")?;

    let prior = GaussianState::from_diagonal(
        DVector::from_row_slice(&config.prior.state),
        &DVector::from_row_slice(&config.prior.covariance_diagonal),
    )
    .context("Invalid [prior] section")?;
    if prior.dim() != builder.state_dim() {
        return Err(anyhow!(
            "prior.state has {} entries, the lane model has {} terms",
            prior.dim(),
            builder.state_dim()
        ));
    }

    let motion = MotionInput::new(
        config.motion.speed,
        config.motion.look_ahead_time,
        config.motion.yaw_rate,
    )
    .context("Invalid [motion] section")?;

    let camera = LaneCamera::new(&config.measurement, builder.state_dim())
        .context("Invalid [measurement] section")?;

    Ok(ResolvedScenario {
        builder,
        prior,
        motion,
        camera,
    })
}

fn resolve_model(model: &ModelConfig, catalog: &NoiseCatalog) -> Result<LaneModelConfig> {
    let noise = match (&model.noise, &model.noise_profile) {
        (Some(inline), _) => inline.clone(),
        (None, Some(key)) => catalog
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("Noise profile '{}' not found in catalog", key))?,
        (None, None) => NoiseConfig::uniform(
            model.state_dim,
            DEFAULT_PROCESS_NOISE,
            DEFAULT_MEASUREMENT_NOISE,
        ),
    };

    Ok(LaneModelConfig {
        state_dim: model.state_dim,
        noise,
        filter: model.filter,
        singularity_tolerance: model.singularity_tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::parse_scenario;

    fn catalog_with(key: &str, profile: NoiseConfig) -> NoiseCatalog {
        let mut catalog = NoiseCatalog::default();
        catalog.0.insert(key.to_string(), profile);
        catalog
    }

    #[test]
    fn test_default_scenario_resolves() {
        let scenario = resolve_scenario(&ScenarioConfig::default(), &NoiseCatalog::default()).unwrap();
        assert_eq!(scenario.builder.state_dim(), 4);
        assert_eq!(scenario.builder.config().noise, NoiseConfig::default());
        assert_eq!(scenario.motion.look_ahead_distance(), 3.6 * 0.5);
    }

    #[test]
    fn test_noise_profile_comes_from_catalog() {
        let profile = NoiseConfig::uniform(4, 1e-4, 0.02);
        let catalog = catalog_with("noise.tight", profile.clone());
        let config = parse_scenario("[model]\nnoise_profile = \"noise.tight\"\n").unwrap();

        let scenario = resolve_scenario(&config, &catalog).unwrap();
        assert_eq!(scenario.builder.config().noise, profile);

        let missing = parse_scenario("[model]\nnoise_profile = \"noise.nope\"\n").unwrap();
        assert!(resolve_scenario(&missing, &catalog).is_err());
    }

    #[test]
    fn test_inline_noise_wins_over_profile() {
        let catalog = catalog_with("noise.tight", NoiseConfig::uniform(4, 1e-4, 0.02));
        let config = parse_scenario(
            r#"
            [model]
            noise_profile = "noise.tight"
            noise = { process = [0.002, 0.002, 0.002, 0.002], measurement = [0.2, 0.2, 0.2, 0.2] }
            "#,
        )
        .unwrap();

        let scenario = resolve_scenario(&config, &catalog).unwrap();
        assert_eq!(scenario.builder.config().noise.measurement, vec![0.2; 4]);
    }

    #[test]
    fn test_rejects_inconsistent_sections() {
        let catalog = NoiseCatalog::default();

        let zero_speed = parse_scenario("[motion]\nspeed = 0.0\nlook_ahead_time = 0.5\n").unwrap();
        assert!(resolve_scenario(&zero_speed, &catalog).is_err());

        let short_prior =
            parse_scenario("[prior]\nstate = [0.0, 0.0]\ncovariance_diagonal = [1.0, 1.0]\n")
                .unwrap();
        assert!(resolve_scenario(&short_prior, &catalog).is_err());

        let bad_profile_dim = catalog_with("noise.small", NoiseConfig::uniform(2, 1e-3, 0.1));
        let config = parse_scenario("[model]\nnoise_profile = \"noise.small\"\n").unwrap();
        assert!(resolve_scenario(&config, &bad_profile_dim).is_err());
    }
}
