//! Application layer with the gallery orchestration service.

/// Service implementations.
pub mod services;

pub use services::{GalleryService, PhotoReadyEvent};
