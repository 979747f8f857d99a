//! Error types for the map integration

use thiserror::Error;

/// Errors raised while loading the map SDK or calling the geocoder.
///
/// Cloneable so a failed load can be handed to every caller that was waiting
/// on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapsError {
    /// SDK script, readiness signal or module import failed
    #[error("Map SDK failed to load: {0}")]
    Load(String),

    /// Operation needs the SDK but it has not been loaded yet
    #[error("Map SDK is not loaded")]
    NotLoaded,

    /// Geocoder request failed or returned a non-success status
    #[error("Geocoder request failed: {0}")]
    Geocoder(String),

    /// Geocoder response could not be decoded
    #[error("Geocoder response parsing failed: {0}")]
    Decode(String),

    /// Invalid URL or key in the configuration
    #[error("Invalid map configuration: {0}")]
    Config(String),
}
