//! NASA API error types.

use thiserror::Error;

/// Errors from the photo listing collaborator.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("network error talking to the photo API: {message}")]
    Network { message: String },

    #[error("photo API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("rate limited by the photo API, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("failed to decode photo API response: {message}")]
    Decode { message: String },

    #[error("unknown rover: {name}")]
    UnknownRover { name: String },
}

impl ApiError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates an unknown rover error.
    #[must_use]
    pub fn unknown_rover(name: impl Into<String>) -> Self {
        Self::UnknownRover { name: name.into() }
    }

    /// Returns whether the operation is worth retrying later.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::RateLimited { .. })
    }
}
