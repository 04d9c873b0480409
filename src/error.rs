//! Error types for placescope
//!
//! The `Display` text of each variant is the message shown to the user.

use thiserror::Error;

/// Main error type for placescope operations
#[derive(Error, Debug)]
pub enum Error {
    /// Network, transport, non-2xx status or unparseable provider body
    #[error("Provider error: {0}")]
    Provider(String),

    /// The geocoding provider has no address for the coordinate
    #[error("No address found: {0}")]
    NotFound(String),

    #[error("No Wikipedia article found for this location")]
    NoArticleFound,

    #[error("Failed to load Wikipedia page: {0}")]
    PageLoad(String),

    #[error("Failed to load article content: {0}")]
    NoContent(String),

    #[error("Location access denied. Please enable location services.")]
    PermissionDenied,

    #[error("Error getting your location. Please try again. ({0})")]
    LocationUnavailable(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// Not usable as a Wikipedia subdomain
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    #[error("No valid location name found")]
    MissingSearchTerm,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for placescope operations
pub type Result<T> = std::result::Result<T, Error>;
