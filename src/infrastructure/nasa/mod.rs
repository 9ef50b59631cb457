//! NASA Mars Photos API adapter.

pub mod client;
pub mod dto;
pub mod url;

pub use client::NasaApiClient;
pub use url::upgrade_to_https;
