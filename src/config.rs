//! JSON run configuration for the demo binary.
//!
//! Every section has defaults, so `{}` is a valid config. Paths are taken
//! relative to the working directory.
use crate::collection::ErrorImageParams;
use crate::rm::RmMapParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub dataset: SyntheticDataset,
    pub rm: RmMapParams,
    pub error: ErrorImageParams,
    pub output: OutputConfig,
}

/// Synthetic Q/U replicas: a source with an RM gradient along x and
/// uniform noise of half-width `noise` on every Q and U pixel.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyntheticDataset {
    pub width: usize,
    pub height: usize,
    /// Observing frequencies (Hz).
    pub frequencies: Vec<f64>,
    /// RM at `x = 0` (rad/m²).
    pub rm_start: f64,
    /// RM increment per pixel along x (rad/m²).
    pub rm_gradient: f64,
    /// Angle at zero wavelength (rad).
    pub chi0: f64,
    /// Polarized flux of the noiseless source.
    pub pol_flux: f64,
    pub noise: f64,
    pub replicas: usize,
    pub seed: u64,
    /// Pixels with polarized flux below this are masked out of the RM fit.
    pub pol_flux_threshold: f64,
    /// Width of the border band excluded from every map (pixels).
    pub edge_margin: usize,
}

impl Default for SyntheticDataset {
    fn default() -> Self {
        Self {
            width: 32,
            height: 16,
            frequencies: vec![4.6e9, 5.0e9, 8.1e9, 8.4e9],
            rm_start: -100.0,
            rm_gradient: 10.0,
            chi0: 0.3,
            pol_flux: 1.0,
            noise: 0.05,
            replicas: 20,
            seed: 7,
            pol_flux_threshold: 0.0,
            edge_margin: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub result_json: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            result_json: PathBuf::from("out/rm_bootstrap.json"),
        }
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rm::UnwrapMode;

    #[test]
    fn empty_object_uses_defaults() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dataset.frequencies.len(), 4);
        assert_eq!(config.error.credible_mass, 0.68);
        assert_eq!(config.rm.fit.unwrap, UnwrapMode::Greedy);
    }

    #[test]
    fn nested_sections_override_fields() {
        let json = r#"{
            "dataset": {"replicas": 5, "frequencies": [1.4e9, 5e9], "edge_margin": 0},
            "rm": {"fit": {"unwrap": "disabled", "initial_guess": [10.0, 0.1]}, "best_effort": true},
            "error": {"credible_mass": 0.95},
            "output": {"result_json": "run.json"}
        }"#;
        let config: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.dataset.replicas, 5);
        assert_eq!(config.dataset.width, 32);
        assert_eq!(config.dataset.edge_margin, 0);
        assert_eq!(config.rm.fit.unwrap, UnwrapMode::Disabled);
        assert_eq!(config.rm.fit.initial_guess, (10.0, 0.1));
        assert!(config.rm.best_effort);
        assert_eq!(config.error.credible_mass, 0.95);
        assert_eq!(config.output.result_json, PathBuf::from("run.json"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.contains("does/not/exist.json"));
    }
}
