//! NASA image URL normalization.

/// Upgrades a plain-http image URL to https.
///
/// The Mars photos API still hands out `http://mars.jpl.nasa.gov/...` source
/// URLs; the JPL servers accept https, and app transport policies require it.
/// URLs that are already https (or not http at all) pass through unchanged.
#[must_use]
pub fn upgrade_to_https(url: &str) -> String {
    url.strip_prefix("http://")
        .map_or_else(|| url.to_string(), |rest| format!("https://{rest}"))
}
