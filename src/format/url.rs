//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{Output, OutputFormatter};

/// URL formatter - map links for places, the canonical link for articles
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        output: Output<'_>,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        match output {
            Output::Candidates([]) => Err(Error::NotFound("no search results".to_string())),
            Output::Candidates(candidates) => {
                let urls = candidates
                    .iter()
                    .map(|c| config.format_url(provider, c.coordinate))
                    .collect::<Result<Vec<_>>>()?;
                Ok(urls.join("\n"))
            }
            Output::Address(address) => config.format_url(provider, address.coordinate),
            Output::Article { article, .. } => Ok(article.summary.canonical_url.clone()),
        }
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map or article links"
    }

    fn format(&self, output: Output<'_>, config: &Config) -> Result<String> {
        self.format_with_provider(output, config, None)
    }
}
