//! Image fetch port definition.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::entities::PhotoReference;
use crate::domain::errors::FetchError;

/// Port for downloading raw image bytes.
///
/// Implementations may be invoked from any worker, concurrently. A single
/// attempt is made per call; retry policy belongs to the caller.
#[async_trait]
pub trait ImageFetchPort: Send + Sync {
    /// Downloads the image bytes for a photo reference.
    async fn fetch_image(&self, reference: &PhotoReference) -> Result<Bytes, FetchError>;
}
