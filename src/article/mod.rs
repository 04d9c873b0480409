//! Place articles
//!
//! Resolves a place name to an encyclopedia summary plus the languages the
//! article is available in. The provider is an injected `Encyclopedia`; the
//! shipped one is Wikipedia.
//!
//! ## Resolution
//! Each attempt walks `Idle -> Searching -> PageLoading -> Ready`, or ends in
//! `Failed` from either loading phase. The summary and the cross-language
//! links are fetched concurrently; only the summary is required.

pub mod languages;
pub mod wikipedia;

use crate::config::ProviderConfig;
use crate::constants::article::EMPTY_EXTRACT;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub use languages::{build_language_options, filter_languages, is_valid_code, LanguageOption};

/// Summary of a resolved article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub extract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub canonical_url: String,
    pub language_code: String,
}

/// A successful resolution: the article and its language set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedArticle {
    pub summary: ArticleSummary,
    pub languages: Vec<LanguageOption>,
}

/// A loaded page, as returned by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    /// Canonical page URL when the provider reports one
    pub full_url: Option<String>,
}

/// The provider's summary of a page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageSummary {
    pub extract: String,
    pub thumbnail_url: Option<String>,
    pub canonical_url: Option<String>,
}

/// A link to the same article in another language
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageLink {
    pub language_code: String,
    pub title: String,
}

/// Trait for encyclopedia providers
///
/// Every call names the language edition it targets, so one provider value
/// can serve several languages at once.
pub trait Encyclopedia: Send + Sync {
    /// Ranked article titles matching `term`
    fn search_titles(
        &self,
        language: &str,
        term: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;

    /// Load a page by title; `None` when it does not exist
    fn load_page(
        &self,
        language: &str,
        title: &str,
    ) -> impl std::future::Future<Output = Result<Option<Page>>> + Send;

    /// Summary text of a loaded page; `None` when there is none
    fn summary(
        &self,
        language: &str,
        page: &Page,
    ) -> impl std::future::Future<Output = Result<Option<PageSummary>>> + Send;

    /// Cross-language links of a loaded page
    fn language_links(
        &self,
        language: &str,
        page: &Page,
    ) -> impl std::future::Future<Output = Result<Vec<LanguageLink>>> + Send;

    /// URL of `title` in the `language` edition, for providers that omit one
    fn article_url(&self, language: &str, title: &str) -> String;
}

/// Phase of a single resolution attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPhase {
    Idle,
    Searching,
    PageLoading,
    Ready,
    Failed,
}

impl fmt::Display for ResolutionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::PageLoading => "page_loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Tracks one attempt's phase and reports each transition
struct Attempt<'a, F> {
    phase: ResolutionPhase,
    term: &'a str,
    language: &'a str,
    observer: F,
}

impl<'a, F: FnMut(ResolutionPhase)> Attempt<'a, F> {
    fn new(term: &'a str, language: &'a str, observer: F) -> Self {
        Self {
            phase: ResolutionPhase::Idle,
            term,
            language,
            observer,
        }
    }

    fn enter(&mut self, next: ResolutionPhase) {
        debug!(
            term = self.term,
            language = self.language,
            from = %self.phase,
            to = %next,
            "article resolution"
        );
        self.phase = next;
        (self.observer)(next);
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!(
            term = self.term,
            language = self.language,
            phase = %self.phase,
            error = %error,
            "article resolution failed"
        );
        self.enter(ResolutionPhase::Failed);
        error
    }
}

/// Resolves place names to articles through an `Encyclopedia`
#[derive(Debug)]
pub struct ArticleResolver<E> {
    provider: Arc<E>,
}

impl<E> Clone for ArticleResolver<E> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<E: Encyclopedia> ArticleResolver<E> {
    pub fn new(provider: Arc<E>) -> Self {
        Self { provider }
    }

    /// Resolve `term` in the `language` edition
    pub async fn resolve(&self, term: &str, language: &str) -> Result<ResolvedArticle> {
        self.resolve_observed(term, language, |_| {}).await
    }

    /// Resolve, reporting every phase transition to `observer`
    pub async fn resolve_observed<F>(
        &self,
        term: &str,
        language: &str,
        observer: F,
    ) -> Result<ResolvedArticle>
    where
        F: FnMut(ResolutionPhase) + Send,
    {
        let mut attempt = Attempt::new(term, language, observer);
        let provider = self.provider.as_ref();

        attempt.enter(ResolutionPhase::Searching);
        let titles = match provider.search_titles(language, term).await {
            Ok(titles) => titles,
            Err(e) => return Err(attempt.fail(e)),
        };
        let Some(top) = titles.into_iter().next() else {
            return Err(attempt.fail(Error::NoArticleFound));
        };

        attempt.enter(ResolutionPhase::PageLoading);
        let page = match provider.load_page(language, &top).await {
            Ok(Some(page)) => page,
            Ok(None) => return Err(attempt.fail(Error::PageLoad(format!("{} does not exist", top)))),
            Err(e) => return Err(attempt.fail(Error::PageLoad(e.to_string()))),
        };

        let (summary, links) = tokio::join!(
            provider.summary(language, &page),
            provider.language_links(language, &page)
        );

        let summary = match summary {
            Ok(Some(summary)) => summary,
            Ok(None) => {
                return Err(attempt.fail(Error::NoContent(format!("{} has no summary", page.title))))
            }
            Err(e) => return Err(attempt.fail(Error::NoContent(e.to_string()))),
        };

        let links = links.unwrap_or_else(|e| {
            warn!(title = %page.title, error = %e, "language links unavailable");
            Vec::new()
        });

        let canonical_url = page
            .full_url
            .clone()
            .or(summary.canonical_url)
            .unwrap_or_else(|| provider.article_url(language, &page.title));

        let extract = if summary.extract.trim().is_empty() {
            EMPTY_EXTRACT.to_string()
        } else {
            summary.extract
        };

        let languages = build_language_options(
            links.iter().map(|link| link.language_code.as_str()),
            language,
        );

        attempt.enter(ResolutionPhase::Ready);
        Ok(ResolvedArticle {
            summary: ArticleSummary {
                title: page.title,
                extract,
                thumbnail_url: summary.thumbnail_url,
                canonical_url,
                language_code: language.to_string(),
            },
            languages,
        })
    }
}

/// Get the default encyclopedia backend
pub fn get_encyclopedia(providers: &ProviderConfig) -> Result<wikipedia::WikipediaBackend> {
    wikipedia::WikipediaBackend::new(&providers.wikipedia_host, &providers.user_agent)
}
