//! Gallery orchestration service.
//!
//! Translates cell visibility events into pipeline requests and
//! cancellations. This is the pipeline's only caller: one request per
//! slot-became-visible event, one cancellation per slot-became-invisible
//! event. Loaded photos reach the presentation target through an event
//! channel rather than a view reference.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::entities::{PhotoId, PhotoReference, Rover, SlotId};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ImageFetchPort, PhotoListingPort};
use crate::infrastructure::image::ImagePipeline;

/// Message sent when a photo finishes loading for a slot.
#[derive(Debug, Clone)]
pub struct PhotoReadyEvent {
    /// The slot that requested the photo.
    pub slot: SlotId,
    /// The photo that loaded.
    pub id: PhotoId,
    /// The raw image bytes, ready for decoding by the presentation layer.
    pub bytes: Bytes,
}

/// Drives the photo grid: holds the reference list and feeds the pipeline.
pub struct GalleryService {
    listing: Arc<dyn PhotoListingPort>,
    fetcher: Arc<dyn ImageFetchPort>,
    pipeline: ImagePipeline,
    references: Vec<PhotoReference>,
    event_tx: mpsc::UnboundedSender<PhotoReadyEvent>,
}

impl GalleryService {
    /// Creates a gallery service.
    #[must_use]
    pub fn new(
        listing: Arc<dyn PhotoListingPort>,
        fetcher: Arc<dyn ImageFetchPort>,
        pipeline: ImagePipeline,
        event_tx: mpsc::UnboundedSender<PhotoReadyEvent>,
    ) -> Self {
        Self {
            listing,
            fetcher,
            pipeline,
            references: Vec::new(),
            event_tx,
        }
    }

    /// Fetches mission metadata for a rover.
    ///
    /// # Errors
    /// Returns the listing collaborator's error unchanged.
    pub async fn load_rover(&self, name: &str) -> Result<Rover, ApiError> {
        info!(rover = name, "loading rover mission");
        self.listing.fetch_rover(name).await
    }

    /// Replaces the reference list with the photos of one rover sol.
    ///
    /// # Errors
    /// Returns the listing collaborator's error unchanged.
    pub async fn load_photos(&mut self, rover_name: &str, sol: u32) -> Result<usize, ApiError> {
        let references = self.listing.fetch_photos(rover_name, sol).await?;
        info!(rover = rover_name, sol, count = references.len(), "photo references loaded");
        self.references = references;
        Ok(self.references.len())
    }

    /// Returns the number of loaded photo references.
    #[must_use]
    pub fn photo_count(&self) -> usize {
        self.references.len()
    }

    /// Returns the reference at a grid index, if the list has one.
    #[must_use]
    pub fn reference(&self, index: usize) -> Option<&PhotoReference> {
        self.references.get(index)
    }

    /// Requests the photo at `index` for a slot that became visible.
    pub fn slot_shown(&self, slot: SlotId, index: usize) {
        let Some(reference) = self.references.get(index) else {
            warn!(%slot, index, "slot shown for an index outside the reference list");
            return;
        };

        debug!(%slot, index, id = %reference.id, "slot shown");
        let event_tx = self.event_tx.clone();
        let event_slot = slot.clone();
        let id = reference.id;
        self.pipeline.request(
            slot,
            reference.clone(),
            self.fetcher.clone(),
            move |bytes| {
                let _ = event_tx.send(PhotoReadyEvent {
                    slot: event_slot,
                    id,
                    bytes,
                });
            },
        );
    }

    /// Cancels the request a slot made for the photo at `index`.
    pub fn slot_hidden(&self, slot: SlotId, index: usize) {
        let Some(reference) = self.references.get(index) else {
            return;
        };

        debug!(%slot, index, id = %reference.id, "slot hidden");
        self.pipeline.cancel(slot, reference.id);
    }

    /// Returns the underlying pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &ImagePipeline {
        &self.pipeline
    }
}

impl std::fmt::Debug for GalleryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryService")
            .field("references", &self.references.len())
            .finish_non_exhaustive()
    }
}
