//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::{Output, OutputFormatter};

/// JSON formatter - outputs the result as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON response"
    }

    fn format(&self, output: Output<'_>, _config: &Config) -> Result<String> {
        let json = match output {
            Output::Candidates(candidates) => serde_json::to_string_pretty(candidates)?,
            Output::Address(address) => serde_json::to_string_pretty(address)?,
            Output::Article {
                article,
                languages: true,
            } => serde_json::to_string_pretty(article)?,
            Output::Article { article, .. } => serde_json::to_string_pretty(&article.summary)?,
        };
        Ok(json)
    }
}
