//! Fetch task lifecycle states.

/// State of one outstanding photo fetch.
///
/// Transitions run `Pending -> Running` and from there to exactly one of the
/// terminal states. Terminal transitions are idempotent: a cancelled task
/// never becomes completed, even if the underlying download finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Dispatched but not yet running on a worker.
    #[default]
    Pending,
    /// The download is in flight.
    Running,
    /// The download finished and the payload was applied.
    Completed,
    /// The download failed.
    Failed,
    /// The task was cancelled; any late result is discarded.
    Cancelled,
}

impl FetchState {
    /// Returns true if the task can no longer change state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns true if the task was cancelled.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true if work is still outstanding.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}
