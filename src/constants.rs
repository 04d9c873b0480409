//! Centralized constants for the placescope crate
//!
//! Endpoints and tunables shared by the providers, the session core and the
//! configuration defaults.

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Wikipedia host template, `{lang}` is replaced by the language code
    pub const WIKIPEDIA_HOST: &str = "https://{lang}.wikipedia.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User agent sent to every provider (Nominatim rejects anonymous clients)
    pub const USER_AGENT: &str = concat!("placescope/", env!("CARGO_PKG_VERSION"));
}

/// Search input handling
pub mod search {
    /// Quiet period before a live search fires
    pub const DEBOUNCE_MS: u64 = 300;

    /// Queries shorter than this (after trimming) never reach the network
    pub const MIN_QUERY_CHARS: usize = 3;
}

/// Article resolution
pub mod article {
    /// Language used when nothing else is configured
    pub const DEFAULT_LANGUAGE: &str = "en";

    /// Shown when the provider returns an empty extract
    pub const EMPTY_EXTRACT: &str = "No content available";
}

/// Map defaults
pub mod map {
    /// Initial map center (London)
    pub const DEFAULT_LAT: f64 = 51.505;
    pub const DEFAULT_LON: f64 = -0.09;
}
