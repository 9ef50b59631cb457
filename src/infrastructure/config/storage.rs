//! Configuration persistence.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::info;

use super::gallery_config::GalleryConfig;

const APP_QUALIFIER: &str = "dev";
const APP_ORGANIZATION: &str = "marsgrid";
const APP_NAME: &str = "marsgrid";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors from loading or saving configuration.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Loads and saves the gallery configuration file.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Creates a manager rooted at the platform config directory.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration directory cannot be
    /// determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a manager rooted at a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads the gallery configuration, creating a default file if missing.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, written, or parsed.
    pub fn load_config(&self) -> Result<GalleryConfig, ConfigError> {
        let config_path = self.config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(path = ?config_path, "config file not found, creating default");
            let default_config = GalleryConfig::default();
            self.save_config(&default_config)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Saves the gallery configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the directory cannot be created or the file
    /// cannot be written.
    pub fn save_config(&self, config: &GalleryConfig) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.config_dir)?;
        let config_path = self.config_dir.join(CONFIG_FILE_NAME);
        let serialized = toml::to_string_pretty(config)?;
        fs::write(config_path, serialized)?;
        Ok(())
    }
}
