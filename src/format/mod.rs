//! Output formatters
//!
//! Provides trait-based output formatting for lookup results.

pub mod json;
pub mod text;
pub mod url;

use crate::article::ResolvedArticle;
use crate::config::Config;
use crate::error::Result;
use crate::geo::{AddressRecord, SearchCandidate};
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Something a one-shot command prints
#[derive(Debug, Clone, Copy)]
pub enum Output<'a> {
    Candidates(&'a [SearchCandidate]),
    Address(&'a AddressRecord),
    /// An article, optionally with its language set
    Article {
        article: &'a ResolvedArticle,
        languages: bool,
    },
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a result
    ///
    /// # Arguments
    /// * `output` - The result to format
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, output: Output<'_>, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Full JSON response".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
        FormatInfo {
            name: "url".to_string(),
            description: "Map or article links".to_string(),
        },
    ]
}
