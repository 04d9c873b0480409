//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, article, map, search};

/// Debounce window for live search in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = search::DEBOUNCE_MS;

/// Minimum trimmed query length before a search is sent
pub const DEFAULT_MIN_CHARS: usize = search::MIN_QUERY_CHARS;

/// Live (timer-triggered) search by default
pub const DEFAULT_LIVE_SEARCH: bool = true;

/// Default article language
pub const DEFAULT_LANGUAGE: &str = article::DEFAULT_LANGUAGE;

/// Default position source
pub const DEFAULT_GEOLOCATION: &str = "ip";

/// Default map center
pub const DEFAULT_LAT: f64 = map::DEFAULT_LAT;
pub const DEFAULT_LON: f64 = map::DEFAULT_LON;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Provider endpoints
pub const DEFAULT_NOMINATIM_URL: &str = api::NOMINATIM_URL;
pub const DEFAULT_WIKIPEDIA_HOST: &str = api::WIKIPEDIA_HOST;
pub const DEFAULT_IP_API_URL: &str = api::IP_API_URL;
pub const DEFAULT_USER_AGENT: &str = api::USER_AGENT;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "placescope";
