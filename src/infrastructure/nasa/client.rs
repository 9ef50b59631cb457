//! NASA Mars Photos API HTTP client.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{ErrorEnvelope, ManifestEnvelope, PhotosEnvelope};
use super::url::upgrade_to_https;
use crate::domain::entities::{PhotoReference, Rover};
use crate::domain::errors::{ApiError, FetchError};
use crate::domain::ports::{ImageFetchPort, PhotoListingPort};
use crate::infrastructure::config::ApiConfig;

const USER_AGENT: &str = concat!("marsgrid/", env!("CARGO_PKG_VERSION"));

/// NASA Mars Photos API client.
///
/// Implements both collaborator ports: listing rovers and their photo
/// references, and downloading the raw image bytes a reference points at.
pub struct NasaApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NasaApiClient {
    /// Creates a client with the default API configuration.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_config(&ApiConfig::default())
    }

    /// Creates a client from an API configuration.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn map_request_error(e: &reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::network("request timed out")
        } else if e.is_connect() {
            ApiError::network("failed to connect to the photo API")
        } else {
            ApiError::network(e.to_string())
        }
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> ApiError {
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { retry_after_ms: 5000 },
            _ => ApiError::status(status.as_u16(), message),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "failed to reach the photo API");
                Self::map_request_error(&e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::decode(e.to_string()))
    }
}

#[async_trait]
impl PhotoListingPort for NasaApiClient {
    async fn fetch_rover(&self, name: &str) -> Result<Rover, ApiError> {
        let url = format!("{}/manifests/{}", self.base_url, name.to_lowercase());
        debug!(rover = name, "fetching mission manifest");

        let envelope: ManifestEnvelope = self.get_json(&url).await.map_err(|e| match e {
            ApiError::Status { status: 404, .. } => ApiError::unknown_rover(name),
            other => other,
        })?;

        let rover: Rover = envelope.photo_manifest.into();
        debug!(
            rover = %rover.name,
            max_sol = rover.max_sol,
            total_photos = rover.total_photos,
            "mission manifest fetched"
        );
        Ok(rover)
    }

    async fn fetch_photos(
        &self,
        rover_name: &str,
        sol: u32,
    ) -> Result<Vec<PhotoReference>, ApiError> {
        let url = format!(
            "{}/rovers/{}/photos?sol={}",
            self.base_url,
            rover_name.to_lowercase(),
            sol
        );
        debug!(rover = rover_name, sol, "fetching photo references");

        let envelope: PhotosEnvelope = self.get_json(&url).await?;
        let references: Vec<PhotoReference> =
            envelope.photos.into_iter().map(Into::into).collect();

        debug!(rover = rover_name, sol, count = references.len(), "photo references fetched");
        Ok(references)
    }
}

#[async_trait]
impl ImageFetchPort for NasaApiClient {
    async fn fetch_image(&self, reference: &PhotoReference) -> Result<Bytes, FetchError> {
        let url = upgrade_to_https(&reference.img_src);
        debug!(id = %reference.id, url = %url, "downloading photo");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::network("request timed out")
            } else if e.is_connect() {
                FetchError::network("failed to connect to the image host")
            } else {
                FetchError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::body(e.to_string()))
    }
}
