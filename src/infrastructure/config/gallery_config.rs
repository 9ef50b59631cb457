//! Gallery configuration.

use serde::{Deserialize, Serialize};

use crate::infrastructure::image::PipelineConfig;

/// Default NASA Mars Photos API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.nasa.gov/mars-photos/api/v1";

/// Default (rate-limited) NASA API key.
pub const DEFAULT_API_KEY: &str = "DEMO_KEY";

/// NASA API access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the Mars Photos API.
    pub base_url: String,
    /// NASA API key.
    pub api_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Top-level configuration for the gallery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// NASA API access.
    pub api: ApiConfig,
    /// Image pipeline tuning.
    pub pipeline: PipelineConfig,
}
