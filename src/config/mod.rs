//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/placescope/config.toml

pub mod defaults;

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::search::{SearchMode, SearchSettings};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search input handling
    #[serde(default)]
    pub search: SearchConfig,

    /// Provider endpoints
    #[serde(default)]
    pub providers: ProviderConfig,

    /// Article settings
    #[serde(default)]
    pub article: ArticleConfig,

    /// Location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Map URL settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Search input handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a live search fires, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum trimmed query length
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Start in live mode (false: manual, search on submit only)
    #[serde(default = "default_live")]
    pub live: bool,
}

/// Provider endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// Wikipedia host template containing `{lang}`
    #[serde(default = "default_wikipedia_host")]
    pub wikipedia_host: String,

    #[serde(default = "default_ip_api_url")]
    pub ip_api_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Article settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleConfig {
    /// Initial article language
    #[serde(default = "default_language")]
    pub language: String,
}

/// Location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Position source: "ip", "fixed" or "off"
    #[serde(default = "default_geolocation")]
    pub geolocation: String,

    /// Initial map center, also the answer of the "fixed" source
    #[serde(default = "default_lat")]
    pub default_lat: f64,

    #[serde(default = "default_lon")]
    pub default_lon: f64,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: BTreeMap<String, String>,
}

// Default value functions for serde
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_min_chars() -> usize {
    DEFAULT_MIN_CHARS
}
fn default_live() -> bool {
    DEFAULT_LIVE_SEARCH
}
fn default_nominatim_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}
fn default_wikipedia_host() -> String {
    DEFAULT_WIKIPEDIA_HOST.to_string()
}
fn default_ip_api_url() -> String {
    DEFAULT_IP_API_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_geolocation() -> String {
    DEFAULT_GEOLOCATION.to_string()
}
fn default_lat() -> f64 {
    DEFAULT_LAT
}
fn default_lon() -> f64 {
    DEFAULT_LON
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> BTreeMap<String, String> {
    let mut providers = BTreeMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},15z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}".to_string(),
    );
    providers
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_chars: default_min_chars(),
            live: default_live(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            wikipedia_host: default_wikipedia_host(),
            ip_api_url: default_ip_api_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            geolocation: default_geolocation(),
            default_lat: default_lat(),
            default_lon: default_lon(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl SearchConfig {
    /// Debouncer settings for this config
    pub fn settings(&self) -> SearchSettings {
        SearchSettings {
            delay: Duration::from_millis(self.debounce_ms),
            min_chars: self.min_chars,
            mode: if self.live {
                SearchMode::Live
            } else {
                SearchMode::Manual
            },
        }
    }
}

impl LocationConfig {
    /// The configured map center as a validated coordinate
    pub fn default_center(&self) -> Result<Coordinate> {
        Coordinate::new(self.default_lat, self.default_lon)
            .map_err(|e| Error::Config(format!("Invalid default location: {}", e)))
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, writing defaults there if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "min_chars"] => Some(self.search.min_chars.to_string()),
            ["search", "live"] => Some(self.search.live.to_string()),

            ["providers", "nominatim_url"] => Some(self.providers.nominatim_url.clone()),
            ["providers", "wikipedia_host"] => Some(self.providers.wikipedia_host.clone()),
            ["providers", "ip_api_url"] => Some(self.providers.ip_api_url.clone()),
            ["providers", "user_agent"] => Some(self.providers.user_agent.clone()),

            ["article", "language"] => Some(self.article.language.clone()),

            ["location", "geolocation"] => Some(self.location.geolocation.clone()),
            ["location", "default_lat"] => Some(self.location.default_lat.to_string()),
            ["location", "default_lon"] => Some(self.location.default_lon.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "debounce_ms"] => {
                self.search.debounce_ms = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid debounce value: {}", value))
                })?;
            }
            ["search", "min_chars"] => {
                self.search.min_chars = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid min_chars value: {}", value))
                })?;
            }
            ["search", "live"] => {
                self.search.live = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }

            ["providers", "nominatim_url"] => {
                self.providers.nominatim_url = value.to_string();
            }
            ["providers", "wikipedia_host"] => {
                if !value.contains("{lang}") {
                    return Err(Error::Config(format!(
                        "Wikipedia host must contain {{lang}}: {}",
                        value
                    )));
                }
                self.providers.wikipedia_host = value.to_string();
            }
            ["providers", "ip_api_url"] => {
                self.providers.ip_api_url = value.to_string();
            }
            ["providers", "user_agent"] => {
                self.providers.user_agent = value.to_string();
            }

            ["article", "language"] => {
                self.article.language = value.to_string();
            }

            ["location", "geolocation"] => {
                if !matches!(value, "ip" | "fixed" | "off") {
                    return Err(Error::Config(format!(
                        "Invalid geolocation source: {} (expected ip, fixed or off)",
                        value
                    )));
                }
                self.location.geolocation = value.to_string();
            }
            ["location", "default_lat"] => {
                self.location.default_lat = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid latitude value: {}", value))
                })?;
            }
            ["location", "default_lon"] => {
                self.location.default_lon = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid longitude value: {}", value))
                })?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            ["url", "default"] => {
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "search.debounce_ms",
            "search.min_chars",
            "search.live",
            "providers.nominatim_url",
            "providers.wikipedia_host",
            "providers.ip_api_url",
            "providers.user_agent",
            "article.language",
            "location.geolocation",
            "location.default_lat",
            "location.default_lon",
            "output.format",
            "url.default",
        ]
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat} and {lng} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, coordinate: Coordinate) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &coordinate.latitude().to_string())
            .replace("{lng}", &coordinate.longitude().to_string()))
    }
}
