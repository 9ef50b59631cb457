//! Rover mission metadata entities.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Photo availability for a single sol of the mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolDescription {
    /// Martian day, counted from landing.
    pub sol: u32,
    /// Number of photos taken on that sol.
    pub total_photos: u32,
    /// Camera codes that took photos on that sol.
    #[serde(default)]
    pub cameras: Vec<String>,
}

/// Mission metadata for one Mars rover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rover {
    /// Rover name (e.g. "Curiosity").
    pub name: String,
    /// Launch date from Earth.
    pub launch_date: NaiveDate,
    /// Landing date on Mars.
    pub landing_date: NaiveDate,
    /// Mission status (e.g. "active", "complete").
    pub status: String,
    /// Most recent sol with photos.
    pub max_sol: u32,
    /// Most recent Earth date with photos.
    pub max_date: NaiveDate,
    /// Total photos taken over the mission.
    pub total_photos: u64,
    /// Per-sol photo availability, ordered by sol.
    pub sol_descriptions: Vec<SolDescription>,
}

impl Rover {
    /// Looks up the description for a specific sol, if the mission has one.
    #[must_use]
    pub fn sol_description(&self, sol: u32) -> Option<&SolDescription> {
        self.sol_descriptions.iter().find(|d| d.sol == sol)
    }

    /// Returns true if the mission is still returning photos.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}
