//! placescope: place search, addresses and Wikipedia summaries
//!
//! A library and CLI tool for the core of a map explorer: debounced place
//! search, reverse geocoding of a selected coordinate, and the Wikipedia
//! article for the resolved place with language switching.
//!
//! ## Features
//!
//! - Live (debounced) and manual search with stale-response discard
//! - Nominatim search and reverse lookup
//! - Wikipedia summaries with cross-language links and rollback on failure
//! - A session controller that serializes user intents and network results
//!
//! ## Quick Start
//!
//! ```no_run
//! use placescope::article::{get_encyclopedia, ArticleResolver};
//! use placescope::config::ProviderConfig;
//! use std::sync::Arc;
//!
//! # async fn demo() -> placescope::Result<()> {
//! let providers = ProviderConfig::default();
//! let resolver = ArticleResolver::new(Arc::new(get_encyclopedia(&providers)?));
//!
//! let article = resolver.resolve("Paris", "en").await?;
//! println!("{}: {}", article.summary.title, article.summary.extract);
//! # Ok(())
//! # }
//! ```

pub mod article;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod search;
pub mod session;

#[cfg(test)]
mod fakes;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinate;
pub use error::{Error, Result};
pub use search::{QueryDebouncer, SearchMode, SearchSettings};
pub use session::{Controller, Intent, LocationSessionState, SessionSnapshot};
