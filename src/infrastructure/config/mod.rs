//! Gallery configuration.

mod gallery_config;
mod storage;

pub use gallery_config::{ApiConfig, DEFAULT_API_BASE, DEFAULT_API_KEY, GalleryConfig};
pub use storage::{ConfigError, StorageManager};
