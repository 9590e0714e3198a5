//! Configuration for matboard

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file, looked up in the working directory
pub const LOCAL_CONFIG: &str = "matboard.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory all template names are relative to
    pub templates_dir: PathBuf,

    /// Directory of partials shared by every page, e.g. `partials`
    pub common_partials: Option<String>,

    /// Also offer `_` files next to each page as partials
    pub sibling_partials: bool,

    /// Keep compiled pages for the lifetime of the renderer
    pub cache: bool,

    /// Fail on missing fields instead of rendering them empty
    pub strict_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            common_partials: None,
            sibling_partials: false,
            cache: true,
            strict_mode: false,
        }
    }
}

impl Config {
    /// Load config with fallback chain
    ///
    /// 1. Explicit path, if given
    /// 2. `matboard.yml` in the working directory
    /// 3. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load config from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::debug!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).context(format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}
