//! Cancellable photo fetch task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, trace};

use super::pipeline::{ImageSink, PipelineCommand};
use crate::domain::entities::{FetchState, PhotoId, PhotoReference, SlotId};
use crate::domain::ports::ImageFetchPort;

/// Cooperative cancellation flag shared between the coordinator and a worker.
///
/// Cancellation is advisory: it does not abort an in-flight download, but a
/// worker checks the token before invoking the fetch capability and again
/// before reporting a result, so a cancelled task can never store bytes or
/// notify a sink. `cancel` is idempotent and cannot be undone.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true if cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One outstanding "download bytes for photo X" unit of work.
///
/// Owned by the pipeline coordinator for its whole lifetime. Requests for a
/// key that is already in flight attach themselves as extra waiters instead
/// of spawning a duplicate download.
pub(crate) struct FetchTask {
    key: PhotoId,
    token: CancelToken,
    state: FetchState,
    waiters: Vec<(SlotId, ImageSink)>,
}

impl FetchTask {
    /// Creates a pending task for a photo.
    pub(crate) fn new(key: PhotoId) -> Self {
        Self {
            key,
            token: CancelToken::new(),
            state: FetchState::Pending,
            waiters: Vec::new(),
        }
    }

    /// Attaches a waiter to be notified when the download completes.
    pub(crate) fn add_waiter(&mut self, slot: SlotId, sink: ImageSink) {
        self.waiters.push((slot, sink));
    }

    /// Drops the waiter for a slot, if one is attached.
    pub(crate) fn remove_waiter(&mut self, slot: &SlotId) {
        self.waiters.retain(|(waiting, _)| waiting != slot);
    }

    /// Returns true if any waiter is still attached.
    pub(crate) fn has_waiters(&self) -> bool {
        !self.waiters.is_empty()
    }

    /// Takes all attached waiters for completion fan-out.
    pub(crate) fn take_waiters(&mut self) -> Vec<(SlotId, ImageSink)> {
        std::mem::take(&mut self.waiters)
    }

    /// Records a terminal outcome. Idempotent once terminal.
    pub(crate) fn set_state(&mut self, state: FetchState) {
        if !self.state.is_terminal() {
            self.state = state;
        }
    }

    /// Requests cancellation; a no-op if the task already finished.
    pub(crate) fn cancel(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.token.cancel();
        self.state = FetchState::Cancelled;
        debug!(key = %self.key, "fetch task cancelled");
    }

    /// Begins the download on a worker from the bounded pool.
    ///
    /// The worker reports back on `completion_tx` unless the task was
    /// cancelled first; a cancelled task never invokes the fetch capability
    /// if cancellation happened before a pool permit was available.
    pub(crate) fn start(
        &mut self,
        reference: PhotoReference,
        fetcher: Arc<dyn ImageFetchPort>,
        semaphore: Arc<Semaphore>,
        completion_tx: mpsc::UnboundedSender<PipelineCommand>,
    ) {
        self.set_state(FetchState::Running);

        let key = self.key;
        let token = self.token.clone();

        tokio::spawn(async move {
            let Ok(permit) = semaphore.acquire_owned().await else {
                return;
            };

            if token.is_cancelled() {
                trace!(%key, "fetch cancelled before start");
                return;
            }

            let result = fetcher.fetch_image(&reference).await;
            drop(permit);

            if token.is_cancelled() {
                debug!(%key, "discarding result of cancelled fetch");
                return;
            }

            let _ = completion_tx.send(PipelineCommand::Finished { key, result });
        });
    }
}

impl std::fmt::Debug for FetchTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchTask")
            .field("key", &self.key)
            .field("state", &self.state)
            .field("waiters", &self.waiters.len())
            .finish_non_exhaustive()
    }
}
