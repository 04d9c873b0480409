//! In-memory providers for tests

use crate::article::{
    ArticleSummary, Encyclopedia, LanguageLink, LanguageOption, Page, PageSummary,
    ResolvedArticle,
};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::position::PositionSource;
use crate::geo::{AddressRecord, GeoSearch, SearchCandidate};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Candidate whose coordinate is derived from its id
pub fn candidate(place_id: i64, display_name: &str) -> SearchCandidate {
    let n = (place_id % 180) as f64;
    SearchCandidate {
        place_id,
        coordinate: Coordinate::new(n / 2.0, n).unwrap(),
        display_name: display_name.to_string(),
    }
}

pub fn address(place_id: i64, locality: &str, lat: f64, lon: f64) -> AddressRecord {
    AddressRecord {
        place_id,
        coordinate: Coordinate::new(lat, lon).unwrap(),
        display_name: format!("{}, Testland", locality),
        locality: Some(locality.to_string()),
        region: None,
        country: Some("Testland".to_string()),
        postal_code: None,
    }
}

pub fn article(title: &str, language: &str) -> ResolvedArticle {
    ResolvedArticle {
        summary: ArticleSummary {
            title: title.to_string(),
            extract: format!("About {}.", title),
            thumbnail_url: None,
            canonical_url: format!("https://{}.wikipedia.org/wiki/{}", language, title),
            language_code: language.to_string(),
        },
        languages: vec![LanguageOption::new(language)],
    }
}

#[derive(Debug, Default)]
pub struct FakeGeo {
    results: HashMap<String, Vec<SearchCandidate>>,
    search_latency: HashMap<String, Duration>,
    failing: HashSet<String>,
    addresses: Vec<AddressRecord>,
    reverse_latency: Vec<(Coordinate, Duration)>,
    search_calls: Mutex<Vec<String>>,
    reverse_calls: Mutex<Vec<Coordinate>>,
}

impl FakeGeo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, candidates: Vec<SearchCandidate>) -> Self {
        self.results.insert(query.to_string(), candidates);
        self
    }

    pub fn with_search_latency(mut self, query: &str, latency: Duration) -> Self {
        self.search_latency.insert(query.to_string(), latency);
        self
    }

    pub fn failing_search(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    /// Answer reverse lookups at the address's own coordinate
    pub fn with_address(mut self, address: AddressRecord) -> Self {
        self.addresses.push(address);
        self
    }

    pub fn with_reverse_latency(mut self, coordinate: Coordinate, latency: Duration) -> Self {
        self.reverse_latency.push((coordinate, latency));
        self
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn reverse_calls(&self) -> Vec<Coordinate> {
        self.reverse_calls.lock().unwrap().clone()
    }
}

impl GeoSearch for FakeGeo {
    async fn search(&self, text: &str) -> Result<Vec<SearchCandidate>> {
        self.search_calls.lock().unwrap().push(text.to_string());

        if let Some(latency) = self.search_latency.get(text) {
            tokio::time::sleep(*latency).await;
        }
        if self.failing.contains(text) {
            return Err(Error::Provider(format!("search for {} failed", text)));
        }
        Ok(self.results.get(text).cloned().unwrap_or_default())
    }

    async fn reverse_lookup(&self, coordinate: Coordinate) -> Result<AddressRecord> {
        self.reverse_calls.lock().unwrap().push(coordinate);

        let latency = self
            .reverse_latency
            .iter()
            .find(|(c, _)| *c == coordinate)
            .map(|(_, latency)| *latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        self.addresses
            .iter()
            .find(|a| a.coordinate == coordinate)
            .cloned()
            .ok_or_else(|| Error::NotFound(coordinate.to_string()))
    }
}

type Key = (String, String);

fn key(language: &str, text: &str) -> Key {
    (language.to_string(), text.to_string())
}

#[derive(Debug, Default)]
pub struct FakeEncyclopedia {
    search: HashMap<Key, Vec<String>>,
    pages: HashMap<Key, Page>,
    summaries: HashMap<Key, PageSummary>,
    links: HashMap<Key, Vec<LanguageLink>>,
    failing_links: HashSet<Key>,
    latency: HashMap<String, Duration>,
}

impl FakeEncyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page titled `title` that a search for `title` finds
    pub fn with_article(mut self, language: &str, title: &str, extract: &str) -> Self {
        self.search
            .insert(key(language, title), vec![title.to_string()]);
        self.pages.insert(
            key(language, title),
            Page {
                title: title.to_string(),
                full_url: None,
            },
        );
        self.summaries.insert(
            key(language, title),
            PageSummary {
                extract: extract.to_string(),
                ..PageSummary::default()
            },
        );
        self
    }

    pub fn with_links(mut self, language: &str, title: &str, codes: &[&str]) -> Self {
        let links = codes
            .iter()
            .map(|code| LanguageLink {
                language_code: code.to_string(),
                title: title.to_string(),
            })
            .collect();
        self.links.insert(key(language, title), links);
        self
    }

    /// A search hit with no page behind it
    pub fn with_search_hit(mut self, language: &str, term: &str, title: &str) -> Self {
        self.search
            .insert(key(language, term), vec![title.to_string()]);
        self
    }

    pub fn without_summary(mut self, language: &str, title: &str) -> Self {
        self.summaries.remove(&key(language, title));
        self
    }

    pub fn failing_links(mut self, language: &str, title: &str) -> Self {
        self.failing_links.insert(key(language, title));
        self
    }

    pub fn with_page_url(mut self, language: &str, title: &str, url: &str) -> Self {
        if let Some(page) = self.pages.get_mut(&key(language, title)) {
            page.full_url = Some(url.to_string());
        }
        self
    }

    /// Delay every title search in `language`
    pub fn with_latency(mut self, language: &str, latency: Duration) -> Self {
        self.latency.insert(language.to_string(), latency);
        self
    }
}

impl Encyclopedia for FakeEncyclopedia {
    async fn search_titles(&self, language: &str, term: &str) -> Result<Vec<String>> {
        if let Some(latency) = self.latency.get(language) {
            tokio::time::sleep(*latency).await;
        }
        Ok(self
            .search
            .get(&key(language, term))
            .cloned()
            .unwrap_or_default())
    }

    async fn load_page(&self, language: &str, title: &str) -> Result<Option<Page>> {
        Ok(self.pages.get(&key(language, title)).cloned())
    }

    async fn summary(&self, language: &str, page: &Page) -> Result<Option<PageSummary>> {
        Ok(self.summaries.get(&key(language, &page.title)).cloned())
    }

    async fn language_links(&self, language: &str, page: &Page) -> Result<Vec<LanguageLink>> {
        let key = key(language, &page.title);
        if self.failing_links.contains(&key) {
            return Err(Error::Provider("langlinks unavailable".to_string()));
        }
        Ok(self.links.get(&key).cloned().unwrap_or_default())
    }

    fn article_url(&self, language: &str, title: &str) -> String {
        format!(
            "https://{}.wikipedia.org/wiki/{}",
            language,
            urlencoding::encode(title)
        )
    }
}

/// Position source whose lookups always fail
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePosition;

impl PositionSource for UnavailablePosition {
    async fn current_position(&self) -> Result<Coordinate> {
        Err(Error::LocationUnavailable("timed out".to_string()))
    }
}
