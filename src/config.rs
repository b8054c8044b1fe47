//! Settings for training and prediction, read from `sentiment.toml`.
//!
//! Every section has defaults, so a missing file (or a missing section) still
//! yields a usable configuration.

use crate::error::{Error, Result};
use crate::paths::resolve_absolute_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "sentiment.toml";

/// `sentiment.toml` next to the executable.
pub fn default_config_path() -> Result<PathBuf> {
    resolve_absolute_path(DEFAULT_CONFIG_FILE)
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataConfig,
    pub features: FeaturesConfig,
    pub trainer: TrainerConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Labeled TSV dataset, relative to the executable directory
    pub dataset_path: String,
    /// Newline-separated sentences scored by `batch`
    pub batch_path: String,
    /// Share of rows held out for evaluation
    pub test_fraction: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub max_features: usize,
    /// Longest word n-gram; words shorter than two characters are skipped
    pub ngram_max: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub max_iterations: u64,
    /// L2 regularization strength
    pub alpha: f64,
    pub gradient_tolerance: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            dataset_path: "../../Data/wikiDetoxAnnotated40kRows.tsv".to_string(),
            batch_path: "../../Data/test_predict.txt".to_string(),
            test_fraction: 0.2,
            seed: 1,
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        FeaturesConfig {
            max_features: 2000,
            ngram_max: 2,
        }
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            max_iterations: 100,
            alpha: 1.0,
            gradient_tolerance: 1e-4,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            model_path: "../../MLModels/SentimentModel.json".to_string(),
        }
    }
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config(e.to_string()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads `path` if it exists, otherwise falls back to the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            debug!("Loading settings from {}", path.display());
            Self::from_file(path)
        } else {
            warn!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fraction = self.data.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(Error::Config(format!(
                "data.test_fraction must be between 0 and 1, got {}",
                fraction
            )));
        }
        if self.features.max_features == 0 {
            return Err(Error::Config("features.max_features must be positive".into()));
        }
        if self.features.ngram_max == 0 {
            return Err(Error::Config("features.ngram_max must be at least 1".into()));
        }
        Ok(())
    }

    pub fn dataset_path(&self) -> Result<PathBuf> {
        resolve_absolute_path(&self.data.dataset_path)
    }

    pub fn batch_path(&self) -> Result<PathBuf> {
        resolve_absolute_path(&self.data.batch_path)
    }

    pub fn model_path(&self) -> Result<PathBuf> {
        resolve_absolute_path(&self.model.model_path)
    }
}
