//! Wikipedia encyclopedia backend
//!
//! Title search, page info and language links go through the MediaWiki
//! action API (`formatversion=2`); summaries come from the REST endpoint.
//! Each language edition lives on its own host.

use crate::article::{is_valid_code, Encyclopedia, LanguageLink, Page, PageSummary};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

const SEARCH_LIMIT: usize = 10;

/// Wikipedia backend
#[derive(Debug, Clone)]
pub struct WikipediaBackend {
    client: reqwest::Client,
    host_template: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    query: Option<T>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<PageInfo>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    fullurl: Option<String>,
    #[serde(default)]
    langlinks: Vec<LangLink>,
}

#[derive(Debug, Deserialize)]
struct LangLink {
    lang: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct RestSummary {
    #[serde(default)]
    extract: String,
    thumbnail: Option<Thumbnail>,
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: Option<DesktopUrls>,
}

#[derive(Debug, Deserialize)]
struct DesktopUrls {
    page: String,
}

impl WikipediaBackend {
    /// Create a backend; `host_template` contains `{lang}`
    pub fn new(host_template: &str, user_agent: &str) -> Result<Self> {
        if !host_template.contains("{lang}") {
            return Err(Error::Config(format!(
                "Wikipedia host must contain {{lang}}: {}",
                host_template
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            host_template: host_template.trim_end_matches('/').to_string(),
        })
    }

    /// Host of the `language` edition; the code must be a plain subdomain
    fn host(&self, language: &str) -> Result<String> {
        if !is_valid_code(language) {
            return Err(Error::InvalidLanguage(language.to_string()));
        }
        Ok(self.host_template.replace("{lang}", language))
    }

    fn api_url(&self, language: &str, params: &[(&str, &str)]) -> Result<String> {
        let mut url = format!(
            "{}/w/api.php?action=query&format=json&formatversion=2",
            self.host(language)?
        );
        for (key, value) in params {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }
        Ok(url)
    }

    fn summary_url(&self, language: &str, title: &str) -> Result<String> {
        Ok(format!(
            "{}/api/rest_v1/page/summary/{}",
            self.host(language)?,
            urlencoding::encode(&title.replace(' ', "_"))
        ))
    }

    /// GET and decode JSON; `None` on 404
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        debug!(url, "Wikipedia request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Wikipedia request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Provider(format!(
                "Wikipedia returned status: {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Provider(format!("Failed to read Wikipedia response: {}", e)))?;
        parse_body(&body).map(Some)
    }

    async fn first_page(&self, url: &str) -> Result<Option<PageInfo>> {
        let response: Option<QueryResponse<PagesQuery>> = self.fetch_json(url).await?;
        Ok(response
            .and_then(|r| r.query)
            .and_then(|q| q.pages.into_iter().next())
            .filter(|p| !p.missing && !p.invalid))
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::Provider(format!("Failed to parse Wikipedia response: {}", e)))
}

fn search_titles_from(response: QueryResponse<SearchQuery>) -> Vec<String> {
    response
        .query
        .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
        .unwrap_or_default()
}

fn summary_from(summary: RestSummary) -> PageSummary {
    PageSummary {
        extract: summary.extract,
        thumbnail_url: summary.thumbnail.map(|t| t.source),
        canonical_url: summary
            .content_urls
            .and_then(|urls| urls.desktop)
            .map(|desktop| desktop.page),
    }
}

impl Encyclopedia for WikipediaBackend {
    async fn search_titles(&self, language: &str, term: &str) -> Result<Vec<String>> {
        let limit = SEARCH_LIMIT.to_string();
        let url = self.api_url(
            language,
            &[
                ("list", "search"),
                ("srsearch", term),
                ("srlimit", &limit),
                ("srprop", ""),
            ],
        )?;

        match self.fetch_json(&url).await? {
            Some(response) => Ok(search_titles_from(response)),
            None => Err(Error::Provider(format!(
                "No Wikipedia edition for language: {}",
                language
            ))),
        }
    }

    async fn load_page(&self, language: &str, title: &str) -> Result<Option<Page>> {
        let url = self.api_url(
            language,
            &[
                ("prop", "info"),
                ("inprop", "url"),
                ("redirects", "1"),
                ("titles", title),
            ],
        )?;

        Ok(self.first_page(&url).await?.map(|info| Page {
            title: info.title,
            full_url: info.fullurl,
        }))
    }

    async fn summary(&self, language: &str, page: &Page) -> Result<Option<PageSummary>> {
        let url = self.summary_url(language, &page.title)?;
        let summary: Option<RestSummary> = self.fetch_json(&url).await?;
        Ok(summary.map(summary_from))
    }

    async fn language_links(&self, language: &str, page: &Page) -> Result<Vec<LanguageLink>> {
        let url = self.api_url(
            language,
            &[
                ("prop", "langlinks"),
                ("lllimit", "max"),
                ("titles", &page.title),
            ],
        )?;

        Ok(self
            .first_page(&url)
            .await?
            .map(|info| {
                info.langlinks
                    .into_iter()
                    .map(|link| LanguageLink {
                        language_code: link.lang,
                        title: link.title,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn article_url(&self, language: &str, title: &str) -> String {
        format!(
            "{}/wiki/{}",
            self.host_template.replace("{lang}", language),
            urlencoding::encode(title)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::api::{USER_AGENT, WIKIPEDIA_HOST};

    fn backend() -> WikipediaBackend {
        WikipediaBackend::new(WIKIPEDIA_HOST, USER_AGENT).unwrap()
    }

    #[test]
    fn test_host_template_required() {
        assert!(matches!(
            WikipediaBackend::new("https://en.wikipedia.org", USER_AGENT),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_urls() {
        let backend = backend();
        assert_eq!(
            backend
                .api_url("fa", &[("list", "search"), ("srsearch", "Tehran city")])
                .unwrap(),
            "https://fa.wikipedia.org/w/api.php?action=query&format=json&formatversion=2&list=search&srsearch=Tehran%20city"
        );
        assert_eq!(
            backend.summary_url("en", "New York City").unwrap(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/New_York_City"
        );
        assert_eq!(
            backend.article_url("en", "New York"),
            "https://en.wikipedia.org/wiki/New%20York"
        );
    }

    #[test]
    fn test_language_code_must_be_subdomain() {
        let backend = backend();
        assert!(matches!(
            backend.api_url("evil.example/#", &[("list", "search")]),
            Err(Error::InvalidLanguage(_))
        ));
        assert!(matches!(
            backend.summary_url("EN", "Paris"),
            Err(Error::InvalidLanguage(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_language_fails_before_request() {
        let result = backend().search_titles("en.evil.example/x?", "Paris").await;
        assert!(matches!(result, Err(Error::InvalidLanguage(_))));
    }

    #[test]
    fn test_parse_search() {
        let body = r#"{"batchcomplete":true,"continue":{"sroffset":10},
            "query":{"searchinfo":{"totalhits":3},
            "search":[{"ns":0,"title":"Paris","pageid":22989},
                      {"ns":0,"title":"Paris, Texas","pageid":1}]}}"#;
        let titles = search_titles_from(parse_body(body).unwrap());
        assert_eq!(titles, vec!["Paris", "Paris, Texas"]);

        let empty = search_titles_from(parse_body(r#"{"batchcomplete":true}"#).unwrap());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_parse_page_info() {
        let body = r#"{"query":{"pages":[{"pageid":22989,"ns":0,"title":"Paris",
            "fullurl":"https://en.wikipedia.org/wiki/Paris"}]}}"#;
        let response: QueryResponse<PagesQuery> = parse_body(body).unwrap();
        let page = response.query.unwrap().pages.into_iter().next().unwrap();
        assert_eq!(page.title, "Paris");
        assert!(!page.missing);
        assert_eq!(page.fullurl.as_deref(), Some("https://en.wikipedia.org/wiki/Paris"));
    }

    #[test]
    fn test_parse_missing_page() {
        let body = r#"{"query":{"pages":[{"ns":0,"title":"Qwzx","missing":true}]}}"#;
        let response: QueryResponse<PagesQuery> = parse_body(body).unwrap();
        assert!(response.query.unwrap().pages[0].missing);
    }

    #[test]
    fn test_parse_langlinks() {
        let body = r#"{"query":{"pages":[{"pageid":22989,"ns":0,"title":"Paris",
            "langlinks":[{"lang":"fr","title":"Paris"},{"lang":"fa","title":"پاریس"}]}]}}"#;
        let response: QueryResponse<PagesQuery> = parse_body(body).unwrap();
        let page = response.query.unwrap().pages.into_iter().next().unwrap();
        let codes: Vec<&str> = page.langlinks.iter().map(|l| l.lang.as_str()).collect();
        assert_eq!(codes, vec!["fr", "fa"]);
    }

    #[test]
    fn test_parse_summary() {
        let body = r#"{"type":"standard","title":"Paris","extract":"Paris is the capital.",
            "thumbnail":{"source":"https://upload.wikimedia.org/paris.jpg","width":320,"height":213},
            "content_urls":{"desktop":{"page":"https://en.wikipedia.org/wiki/Paris"},
                            "mobile":{"page":"https://en.m.wikipedia.org/wiki/Paris"}}}"#;
        let summary = summary_from(parse_body(body).unwrap());
        assert_eq!(summary.extract, "Paris is the capital.");
        assert_eq!(
            summary.thumbnail_url.as_deref(),
            Some("https://upload.wikimedia.org/paris.jpg")
        );
        assert_eq!(
            summary.canonical_url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Paris")
        );

        let bare = summary_from(parse_body(r#"{"title":"X"}"#).unwrap());
        assert_eq!(bare, PageSummary::default());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_body::<RestSummary>("<!DOCTYPE html>"),
            Err(Error::Provider(_))
        ));
    }

    #[tokio::test]
    #[ignore = "Requires network access to Wikipedia"]
    async fn test_live_resolution() {
        use crate::article::ArticleResolver;
        use std::sync::Arc;

        let resolver = ArticleResolver::new(Arc::new(backend()));
        let resolved = resolver.resolve("Paris", "en").await.unwrap();
        assert!(resolved.summary.extract.contains("France"));
        assert!(resolved.languages.iter().any(|l| l.code == "fr"));
    }
}
