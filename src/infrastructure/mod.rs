//! Infrastructure layer with external service adapters.

/// Gallery configuration.
pub mod config;
/// Image pipeline (cache, fetch tasks, coordinator).
pub mod image;
/// NASA Mars Photos API client.
pub mod nasa;

pub use config::{ApiConfig, ConfigError, GalleryConfig, StorageManager};
pub use image::{CacheStats, CancelToken, ImageCache, ImagePipeline, ImageSink, PipelineConfig};
pub use nasa::NasaApiClient;
