//! Image pipeline infrastructure.
//!
//! This module provides:
//! - A shared, unbounded photo byte cache
//! - Cancellable fetch tasks on a bounded worker pool
//! - The pipeline coordinator that ties fetch, store, and notify together

pub mod cache;
pub mod fetch_task;
pub mod pipeline;

#[cfg(test)]
mod pipeline_test;

pub use cache::{CacheStats, ImageCache};
pub use fetch_task::CancelToken;
pub use pipeline::{ImagePipeline, ImageSink, PipelineConfig};
