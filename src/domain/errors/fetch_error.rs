//! Image fetch error types.

use thiserror::Error;

/// Errors surfaced by the image fetch capability.
///
/// A fetch failure is terminal for that single request: it is logged, never
/// retried, and never reaches the sink.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Connection, DNS, or timeout failure before a response arrived.
    #[error("network error fetching image: {message}")]
    Network {
        /// Underlying transport failure.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("image server returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body could not be read.
    #[error("failed to read image body: {message}")]
    Body {
        /// Underlying read failure.
        message: String,
    },
}

impl FetchError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Creates a body read error.
    #[must_use]
    pub fn body(message: impl Into<String>) -> Self {
        Self::Body {
            message: message.into(),
        }
    }
}
