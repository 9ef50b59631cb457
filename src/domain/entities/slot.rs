//! Gallery slot identity.

/// Identifier for a reusable visual placeholder in the gallery grid.
///
/// A slot is rebound to different photos as content scrolls; the pipeline
/// uses the slot-to-photo binding to decide whether a completed fetch is
/// still relevant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotId(pub String);

impl SlotId {
    /// Creates a new `SlotId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SlotId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
