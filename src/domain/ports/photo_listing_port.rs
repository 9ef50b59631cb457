//! Photo listing port definition.

use async_trait::async_trait;

use crate::domain::entities::{PhotoReference, Rover};
use crate::domain::errors::ApiError;

/// Port for listing rover missions and their photos.
#[async_trait]
pub trait PhotoListingPort: Send + Sync {
    /// Fetches mission metadata for a rover by name.
    async fn fetch_rover(&self, name: &str) -> Result<Rover, ApiError>;

    /// Fetches the photo references a rover took on a given sol.
    async fn fetch_photos(
        &self,
        rover_name: &str,
        sol: u32,
    ) -> Result<Vec<PhotoReference>, ApiError>;
}
