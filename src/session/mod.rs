//! Location session state
//!
//! `LocationSessionState` owns what the user currently sees: the selected
//! coordinate and its address, the search candidates, and the article view.
//! Every slot is replaced wholesale, never edited in place; lists are shared
//! as `Arc<[T]>` so a snapshot taken before a replacement stays intact.
//!
//! The state is driven by a `Controller`, which is its only writer.

pub mod controller;

pub use controller::{Completion, Controller, Intent};

use crate::article::{ArticleSummary, LanguageOption, ResolvedArticle};
use crate::coord::Coordinate;
use crate::geo::{AddressRecord, SearchCandidate};
use crate::search::SearchMode;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// The article currently on display with its language picker entries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleView {
    pub summary: Arc<ArticleSummary>,
    pub languages: Arc<[LanguageOption]>,
}

impl From<ResolvedArticle> for ArticleView {
    fn from(resolved: ResolvedArticle) -> Self {
        Self {
            summary: Arc::new(resolved.summary),
            languages: resolved.languages.into(),
        }
    }
}

/// In-progress work, for loading indicators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Activity {
    pub searching: bool,
    pub locating: bool,
    pub loading_address: bool,
    pub loading_article: bool,
}

/// Immutable view of the session handed to display surfaces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub coordinate: Option<Coordinate>,
    pub address: Option<AddressRecord>,
    pub candidates: Arc<[SearchCandidate]>,
    pub article: Option<ArticleView>,
    pub language: String,
    pub search_mode: SearchMode,
    pub activity: Activity,
    pub error: Option<String>,
}

/// App-lifetime state of one location session
#[derive(Debug)]
pub struct LocationSessionState {
    coordinate: Option<Coordinate>,
    address: Option<AddressRecord>,
    candidates: Arc<[SearchCandidate]>,
    article: Option<ArticleView>,
    language: String,
    search_mode: SearchMode,
    activity: Activity,
    error: Option<String>,
}

impl LocationSessionState {
    /// Start a session centered on `center` with `language` selected
    pub fn open(language: &str, center: Option<Coordinate>, search_mode: SearchMode) -> Self {
        info!(language, %search_mode, "location session opened");
        Self {
            coordinate: center,
            address: None,
            candidates: Arc::from(Vec::new()),
            article: None,
            language: language.to_string(),
            search_mode,
            activity: Activity::default(),
            error: None,
        }
    }

    /// End the session; returns the last state seen by the user
    pub fn close(mut self) -> SessionSnapshot {
        let last = self.snapshot();
        self.address = None;
        self.article = None;
        self.candidates = Arc::from(Vec::new());
        info!("location session closed");
        last
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            coordinate: self.coordinate,
            address: self.address.clone(),
            candidates: Arc::clone(&self.candidates),
            article: self.article.clone(),
            language: self.language.clone(),
            search_mode: self.search_mode,
            activity: self.activity,
            error: self.error.clone(),
        }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    pub fn address(&self) -> Option<&AddressRecord> {
        self.address.as_ref()
    }

    pub fn candidates(&self) -> &[SearchCandidate] {
        &self.candidates
    }

    pub fn article(&self) -> Option<&ArticleView> {
        self.article.as_ref()
    }

    /// The selected article language
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Point the session at a new coordinate; the old address stays until
    /// a new one arrives
    pub fn select_coordinate(&mut self, coordinate: Coordinate) {
        self.coordinate = Some(coordinate);
    }

    /// Replace the address; a different place discards the article
    pub fn set_address(&mut self, address: AddressRecord) {
        if self.address.as_ref() != Some(&address) && self.article.take().is_some() {
            debug!(place_id = address.place_id, "address changed, article discarded");
        }
        self.address = Some(address);
    }

    pub fn dismiss_address(&mut self) {
        self.address = None;
        self.article = None;
    }

    pub fn replace_candidates(&mut self, candidates: Vec<SearchCandidate>) {
        self.candidates = candidates.into();
    }

    pub fn clear_candidates(&mut self) {
        if !self.candidates.is_empty() {
            self.candidates = Arc::from(Vec::new());
        }
    }

    pub fn set_article(&mut self, article: ArticleView) {
        self.language = article.summary.language_code.clone();
        self.article = Some(article);
    }

    pub fn dismiss_article(&mut self) {
        self.article = None;
    }

    /// Mark `language` as selected, returning the previous selection
    pub fn select_language(&mut self, language: &str) -> String {
        std::mem::replace(&mut self.language, language.to_string())
    }

    pub fn set_search_mode(&mut self, mode: SearchMode) {
        self.search_mode = mode;
    }

    pub fn update_activity(&mut self, update: impl FnOnce(&mut Activity)) {
        update(&mut self.activity);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{address, article};

    fn session() -> LocationSessionState {
        LocationSessionState::open("en", None, SearchMode::Live)
    }

    #[test]
    fn test_open_is_empty() {
        let session = session();
        let snapshot = session.snapshot();
        assert!(snapshot.address.is_none());
        assert!(snapshot.candidates.is_empty());
        assert!(snapshot.article.is_none());
        assert_eq!(snapshot.language, "en");
    }

    #[test]
    fn test_select_coordinate_keeps_address() {
        let mut session = session();
        let paris = address(1, "Paris", 48.85, 2.35);
        session.set_address(paris.clone());

        session.select_coordinate(Coordinate::new(10.0, 10.0).unwrap());
        assert_eq!(session.address(), Some(&paris));
    }

    #[test]
    fn test_new_address_discards_article() {
        let mut session = session();
        session.set_address(address(1, "Paris", 48.85, 2.35));
        session.set_article(article("Paris", "en").into());

        session.set_address(address(1, "Paris", 48.85, 2.35));
        assert!(session.article().is_some());

        session.set_address(address(2, "Lyon", 45.76, 4.83));
        assert!(session.article().is_none());
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let mut session = session();
        session.replace_candidates(vec![crate::fakes::candidate(1, "London, England")]);
        let before = session.snapshot();

        session.clear_candidates();
        assert_eq!(before.candidates.len(), 1);
        assert!(session.candidates().is_empty());
    }

    #[test]
    fn test_select_language_returns_previous() {
        let mut session = session();
        assert_eq!(session.select_language("de"), "en");
        assert_eq!(session.language(), "de");
    }

    #[test]
    fn test_dismiss_article_keeps_language() {
        let mut session = session();
        session.set_article(article("Berlin", "de").into());
        assert_eq!(session.language(), "de");

        session.dismiss_article();
        assert!(session.article().is_none());
        assert_eq!(session.language(), "de");
    }

    #[test]
    fn test_close_returns_last_snapshot() {
        let mut session = session();
        session.set_address(address(1, "Paris", 48.85, 2.35));
        let last = session.close();
        assert_eq!(last.address.unwrap().locality.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = session();
        session.set_error("boom");
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["search_mode"], "live");
    }
}
