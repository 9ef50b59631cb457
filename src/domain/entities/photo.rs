//! Photo reference entities for the Mars rover gallery.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for one fetchable photo.
///
/// This is the NASA photo id and the cache key: stable for the lifetime of a
/// reference list, hashable, and comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub u64);

impl PhotoId {
    /// Creates a new `PhotoId`.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the inner id.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PhotoId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Rover camera metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    /// NASA camera id.
    pub id: u64,
    /// Short camera code (e.g. "FHAZ").
    pub name: String,
    /// Human readable camera name.
    pub full_name: String,
}

/// One fetchable photo from a rover on a given sol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoReference {
    /// Unique photo id, used as the cache key.
    pub id: PhotoId,
    /// Martian day the photo was taken on.
    pub sol: u32,
    /// Camera that took the photo.
    pub camera: Camera,
    /// Source URL of the image bytes.
    pub img_src: String,
    /// Earth date the photo was taken on.
    pub earth_date: NaiveDate,
}

impl PhotoReference {
    /// Returns the photo id as the cache key.
    #[must_use]
    pub const fn key(&self) -> PhotoId {
        self.id
    }
}
