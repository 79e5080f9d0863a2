// lane_sim/src/simulation/config/catalog.rs

//! The catalog of named noise profiles, loaded from disk at startup.

use figment::{
    providers::{Format, Toml},
    Figment,
};
use lane_core::prelude::NoiseConfig;
use std::{collections::HashMap, path::Path};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Every noise profile found under the catalog directory.
/// The key is a namespace string (e.g., "noise.reference") and
/// the value is the parsed profile.
#[derive(Default, Debug, Clone)]
pub struct NoiseCatalog(pub HashMap<String, NoiseConfig>);

impl NoiseCatalog {
    pub fn get(&self, key: &str) -> Option<&NoiseConfig> {
        self.0.get(key)
    }
}

/// Walks `catalog_path`, parses every `.toml` file as a `NoiseConfig` and
/// keys it by its relative path. Unparsable files are logged and skipped.
pub fn load_catalog_from_disk(catalog_path: &Path) -> NoiseCatalog {
    let mut catalog = NoiseCatalog::default();
    if !catalog_path.exists() {
        warn!(
            "Catalog directory not found at {:?}, no noise profiles will be loaded.",
            catalog_path
        );
        return catalog;
    }

    info!("Loading noise catalog from: {:?}", catalog_path);

    for entry in WalkDir::new(catalog_path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| !e.file_type().is_dir() && e.path().extension().is_some_and(|ext| ext == "toml"))
    {
        let path = entry.path();
        let Ok(relative) = path.strip_prefix(catalog_path) else {
            continue;
        };
        // Create a key like "noise.reference" from the path.
        let key = relative
            .with_extension("")
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, ".");

        match Figment::new().merge(Toml::file(path)).extract::<NoiseConfig>() {
            Ok(profile) => {
                info!("Loaded noise profile: '{}'", key);
                catalog.0.insert(key, profile);
            }
            Err(e) => {
                error!("Failed to load noise profile from {:?}: {}", path, e);
            }
        }
    }

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_loads_nested_profiles_and_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("noise")).unwrap();
        fs::write(
            dir.path().join("noise/tight.toml"),
            "process = [1e-4, 1e-4]\nmeasurement = [0.01, 0.01]\n",
        )
        .unwrap();
        fs::write(dir.path().join("noise/broken.toml"), "process = \"oops\"\n").unwrap();
        fs::write(dir.path().join("noise/README.md"), "not a profile").unwrap();

        let catalog = load_catalog_from_disk(dir.path());

        assert_eq!(catalog.0.len(), 1);
        let tight = catalog.get("noise.tight").unwrap();
        assert_eq!(tight.process, vec![1e-4, 1e-4]);
        assert_eq!(tight.measurement, vec![0.01, 0.01]);
    }

    #[test]
    fn test_missing_directory_gives_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = load_catalog_from_disk(&dir.path().join("does-not-exist"));
        assert!(catalog.0.is_empty());
    }
}
