//! NASA Mars Photos API response structures.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::entities::{Camera, PhotoId, PhotoReference, Rover, SolDescription};

/// Envelope around a mission manifest response.
#[derive(Debug, Deserialize)]
pub struct ManifestEnvelope {
    /// The mission manifest.
    pub photo_manifest: ManifestResponse,
}

/// Mission manifest for one rover.
#[derive(Debug, Deserialize)]
pub struct ManifestResponse {
    /// Rover name.
    pub name: String,
    /// Launch date from Earth.
    pub launch_date: NaiveDate,
    /// Landing date on Mars.
    pub landing_date: NaiveDate,
    /// Mission status.
    pub status: String,
    /// Most recent sol with photos.
    pub max_sol: u32,
    /// Most recent Earth date with photos.
    pub max_date: NaiveDate,
    /// Total photos over the mission.
    pub total_photos: u64,
    /// Per-sol availability entries.
    pub photos: Vec<ManifestSolResponse>,
}

/// One per-sol entry of a mission manifest.
#[derive(Debug, Deserialize)]
pub struct ManifestSolResponse {
    /// Martian day.
    pub sol: u32,
    /// Photos taken on that sol.
    pub total_photos: u32,
    /// Camera codes active on that sol.
    #[serde(default)]
    pub cameras: Vec<String>,
}

impl From<ManifestResponse> for Rover {
    fn from(manifest: ManifestResponse) -> Self {
        Self {
            name: manifest.name,
            launch_date: manifest.launch_date,
            landing_date: manifest.landing_date,
            status: manifest.status,
            max_sol: manifest.max_sol,
            max_date: manifest.max_date,
            total_photos: manifest.total_photos,
            sol_descriptions: manifest
                .photos
                .into_iter()
                .map(|sol| SolDescription {
                    sol: sol.sol,
                    total_photos: sol.total_photos,
                    cameras: sol.cameras,
                })
                .collect(),
        }
    }
}

/// Envelope around a photos-by-sol response.
#[derive(Debug, Deserialize)]
pub struct PhotosEnvelope {
    /// The photos taken on the requested sol.
    pub photos: Vec<PhotoResponse>,
}

/// One photo entry of a photos-by-sol response.
#[derive(Debug, Deserialize)]
pub struct PhotoResponse {
    /// NASA photo id.
    pub id: u64,
    /// Martian day the photo was taken on.
    pub sol: u32,
    /// Camera that took the photo.
    pub camera: CameraResponse,
    /// Source URL of the image bytes.
    pub img_src: String,
    /// Earth date the photo was taken on.
    pub earth_date: NaiveDate,
}

/// Camera details inside a photo entry.
#[derive(Debug, Deserialize)]
pub struct CameraResponse {
    /// NASA camera id.
    pub id: u64,
    /// Short camera code.
    pub name: String,
    /// Human readable camera name.
    pub full_name: String,
}

impl From<PhotoResponse> for PhotoReference {
    fn from(photo: PhotoResponse) -> Self {
        Self {
            id: PhotoId::new(photo.id),
            sol: photo.sol,
            camera: Camera {
                id: photo.camera.id,
                name: photo.camera.name,
                full_name: photo.camera.full_name,
            },
            img_src: photo.img_src,
            earth_date: photo.earth_date,
        }
    }
}

/// NASA API error response structure.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details.
    pub error: ErrorResponse,
}

/// Error details from the NASA API.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}
