//! Fetch-and-cache pipeline coordinating per-slot photo requests.
//!
//! One request walks three dependent stages: fetch, store to the shared
//! cache, apply to the requesting slot. The coordinator owns every piece of
//! pipeline state (outstanding tasks, slot-to-photo bindings) on a single
//! spawned task, so none of it needs a lock; workers only run downloads.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, trace, warn};

use super::cache::ImageCache;
use super::fetch_task::FetchTask;
use crate::domain::entities::{FetchState, PhotoId, PhotoReference, SlotId};
use crate::domain::errors::FetchError;
use crate::domain::ports::ImageFetchPort;

/// Callback receiving image bytes once a request resolves.
///
/// Invoked on the coordinator context, at most once per request, and only
/// while the requesting slot is still bound to the requested photo.
pub type ImageSink = Box<dyn FnOnce(Bytes) + Send>;

/// Configuration for the image pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum concurrent downloads.
    pub max_concurrent_fetches: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 4,
        }
    }
}

pub(crate) enum PipelineCommand {
    Request {
        slot: SlotId,
        reference: PhotoReference,
        fetcher: Arc<dyn ImageFetchPort>,
        sink: ImageSink,
    },
    Cancel {
        slot: SlotId,
        key: PhotoId,
    },
    Finished {
        key: PhotoId,
        result: Result<Bytes, FetchError>,
    },
}

/// State owned exclusively by the coordinator task.
struct CoordinatorState {
    cache: Arc<ImageCache>,
    registry: HashMap<PhotoId, FetchTask>,
    bindings: HashMap<SlotId, PhotoId>,
    semaphore: Arc<Semaphore>,
    completion_tx: mpsc::UnboundedSender<PipelineCommand>,
}

/// Coordinates photo requests for gallery slots.
///
/// Each visible slot issues one [`request`](Self::request); slots that
/// scroll away issue one [`cancel`](Self::cancel). The pipeline fetches
/// each photo at most once, stores the bytes before notifying anyone, and
/// drops completions whose slot has been rebound in the meantime.
pub struct ImagePipeline {
    cache: Arc<ImageCache>,
    command_tx: mpsc::UnboundedSender<PipelineCommand>,
    config: PipelineConfig,
}

impl ImagePipeline {
    /// Creates a pipeline and spawns its coordinator task.
    #[must_use]
    pub fn new(config: PipelineConfig, cache: Arc<ImageCache>) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let state = CoordinatorState {
            cache: cache.clone(),
            registry: HashMap::new(),
            bindings: HashMap::new(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_fetches)),
            completion_tx,
        };

        tokio::spawn(Self::run_coordinator(state, command_rx, completion_rx));

        Self {
            cache,
            command_tx,
            config,
        }
    }

    /// Creates a pipeline with default configuration and a fresh cache.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default(), Arc::new(ImageCache::new()))
    }

    /// Requests the photo for a slot.
    ///
    /// Never blocks: a cached photo reaches the sink immediately, a miss
    /// schedules a download and returns. The sink fires later, off the call
    /// stack, and only if the slot is still showing this photo by then.
    pub fn request(
        &self,
        slot: SlotId,
        reference: PhotoReference,
        fetcher: Arc<dyn ImageFetchPort>,
        sink: impl FnOnce(Bytes) + Send + 'static,
    ) {
        let command = PipelineCommand::Request {
            slot,
            reference,
            fetcher,
            sink: Box::new(sink),
        };
        if self.command_tx.send(command).is_err() {
            error!("image pipeline coordinator is gone, dropping request");
        }
    }

    /// Cancels the outstanding request a slot made for a photo.
    ///
    /// Safe to call when no request is outstanding, after completion, or
    /// repeatedly. Cached photos are never removed.
    pub fn cancel(&self, slot: SlotId, key: PhotoId) {
        let command = PipelineCommand::Cancel { slot, key };
        if self.command_tx.send(command).is_err() {
            error!("image pipeline coordinator is gone, dropping cancel");
        }
    }

    /// Returns a shared handle to the photo cache.
    #[must_use]
    pub fn cache(&self) -> Arc<ImageCache> {
        self.cache.clone()
    }

    /// Returns the pipeline configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    async fn run_coordinator(
        mut state: CoordinatorState,
        mut command_rx: mpsc::UnboundedReceiver<PipelineCommand>,
        mut completion_rx: mpsc::UnboundedReceiver<PipelineCommand>,
    ) {
        loop {
            tokio::select! {
                command = command_rx.recv() => {
                    match command {
                        Some(PipelineCommand::Request { slot, reference, fetcher, sink }) => {
                            Self::handle_request(&mut state, slot, reference, fetcher, sink);
                        }
                        Some(PipelineCommand::Cancel { slot, key }) => {
                            Self::handle_cancel(&mut state, &slot, key);
                        }
                        Some(PipelineCommand::Finished { key, result }) => {
                            Self::handle_finished(&mut state, key, result);
                        }
                        None => break,
                    }
                }
                Some(PipelineCommand::Finished { key, result }) = completion_rx.recv() => {
                    Self::handle_finished(&mut state, key, result);
                }
            }
        }
    }

    fn handle_request(
        state: &mut CoordinatorState,
        slot: SlotId,
        reference: PhotoReference,
        fetcher: Arc<dyn ImageFetchPort>,
        sink: ImageSink,
    ) {
        let key = reference.id;
        state.bindings.insert(slot.clone(), key);

        if let Some(bytes) = state.cache.get(&key) {
            trace!(%slot, %key, "serving photo from cache");
            sink(bytes);
            return;
        }

        if let Some(task) = state.registry.get_mut(&key) {
            debug!(%slot, %key, "coalescing into in-flight fetch");
            task.add_waiter(slot, sink);
            return;
        }

        debug!(%slot, %key, "dispatching photo fetch");
        let mut task = FetchTask::new(key);
        task.add_waiter(slot, sink);
        task.start(
            reference,
            fetcher,
            state.semaphore.clone(),
            state.completion_tx.clone(),
        );
        state.registry.insert(key, task);
    }

    fn handle_cancel(state: &mut CoordinatorState, slot: &SlotId, key: PhotoId) {
        if state.bindings.get(slot) == Some(&key) {
            state.bindings.remove(slot);
        }

        let Some(task) = state.registry.get_mut(&key) else {
            trace!(%slot, %key, "cancel with no outstanding fetch");
            return;
        };

        task.remove_waiter(slot);
        if !task.has_waiters() {
            if let Some(mut task) = state.registry.remove(&key) {
                task.cancel();
            }
        }
    }

    fn handle_finished(
        state: &mut CoordinatorState,
        key: PhotoId,
        result: Result<Bytes, FetchError>,
    ) {
        let Some(mut task) = state.registry.remove(&key) else {
            trace!(%key, "completion for a cancelled or unknown fetch");
            return;
        };

        match result {
            Ok(bytes) => {
                task.set_state(FetchState::Completed);
                // Store happens-before notify: a concurrent request for this
                // key must observe the cache hit, never race a second fetch.
                state.cache.put(key, bytes.clone());
                for (slot, sink) in task.take_waiters() {
                    if state.bindings.get(&slot) == Some(&key) {
                        sink(bytes.clone());
                    } else {
                        debug!(%slot, %key, "discarding stale completion");
                    }
                }
            }
            Err(error) => {
                task.set_state(FetchState::Failed);
                warn!(%key, error = %error, "photo fetch failed");
            }
        }
    }
}

impl std::fmt::Debug for ImagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
