//! Build, solver and search configuration.
//!
//! Every section has defaults matching the reference SMR study, so a TOML
//! file only needs the keys it changes:
//!
//! ```toml
//! [core]
//! rings = 1
//! axial = 1
//!
//! [search]
//! population = 20
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Full-core build options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Equal-area annular rings per fuel pellet.
    pub rings: usize,
    /// Axial segments over the active fuel length.
    pub axial: usize,
    /// Use fuel compositions seeded with trace fission products.
    pub depleted: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self { rings: 10, axial: 196, depleted: false }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureSettings {
    pub default_k: f64,
    pub method: String,
    pub range_k: [f64; 2],
}

impl Default for TemperatureSettings {
    fn default() -> Self {
        Self {
            // 497 F core inlet
            default_k: (497.0 - 32.0) * 5.0 / 9.0 + 273.15,
            method: "interpolation".to_string(),
            range_k: [300.0, 1500.0],
        }
    }
}

/// Eigenvalue run settings handed to the solver with the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub batches: u32,
    pub inactive: u32,
    pub particles: u64,
    pub temperature: TemperatureSettings,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            batches: 150,
            inactive: 30,
            particles: 10_000,
            temperature: TemperatureSettings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Parent of the per-evaluation scratch directories.
    pub scratch_root: PathBuf,
    /// Fresh identifiers tried before a scratch directory is given up on.
    pub scratch_attempts: usize,
    /// Fitness reported when the solver fails. Defaults per objective.
    pub failure_fitness: Option<f64>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            scratch_root: std::env::temp_dir().join("reactor-csg"),
            scratch_attempts: 8,
            failure_fitness: None,
        }
    }
}

/// Differential evolution settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub population: usize,
    pub generations: usize,
    /// Differential weight.
    pub f: f64,
    /// Crossover probability.
    pub cr: f64,
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { population: 10, generations: 30, f: 0.5, cr: 0.3, seed: Some(100) }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub core: CoreConfig,
    pub settings: RunSettings,
    pub evaluation: EvaluationConfig,
    pub search: SearchConfig,
}

impl ModelConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
