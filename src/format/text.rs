//! Human-readable text output formatter
//!
//! The block builders are shared with the interactive session's renderer.

use crate::article::{ArticleSummary, LanguageOption};
use crate::config::Config;
use crate::error::Result;
use crate::format::{Output, OutputFormatter};
use crate::geo::{AddressRecord, SearchCandidate};

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

/// One numbered line per candidate: primary name, then the rest dimmed by indent
pub fn candidate_lines(candidates: &[SearchCandidate]) -> String {
    if candidates.is_empty() {
        return "No results\n".to_string();
    }

    let mut output = String::new();
    for (i, candidate) in candidates.iter().enumerate() {
        output.push_str(&format!("{:>3}. {}\n", i + 1, candidate.primary_name()));
        let secondary = candidate.secondary_name();
        if !secondary.is_empty() {
            output.push_str(&format!("     {}\n", secondary));
        }
    }
    output
}

pub fn address_block(address: &AddressRecord) -> String {
    let mut output = String::new();

    let heading = match address.heading() {
        "" => address.display_name.as_str(),
        heading => heading,
    };
    output.push_str(&format!("{}\n", heading));

    let subtitle = address.subtitle();
    if !subtitle.is_empty() {
        output.push_str(&format!("{}\n", subtitle));
    }
    if let Some(postal_code) = &address.postal_code {
        output.push_str(&format!("Postal code: {}\n", postal_code));
    }
    output.push_str(&format!("Coordinates: {}\n", address.coordinate));
    output
}

pub fn article_block(summary: &ArticleSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} [{}]\n\n", summary.title, summary.language_code));
    output.push_str(&format!("{}\n\n", summary.extract));
    if let Some(thumbnail) = &summary.thumbnail_url {
        output.push_str(&format!("Image: {}\n", thumbnail));
    }
    output.push_str(&format!("Read more: {}\n", summary.canonical_url));
    output
}

/// The language picker, current language marked with `*`
pub fn language_lines<'a, I>(languages: I, current: &str) -> String
where
    I: IntoIterator<Item = &'a LanguageOption>,
{
    let mut output = String::new();
    for option in languages {
        let marker = if option.code == current { '*' } else { ' ' };
        let direction = if option.is_rtl() { " (rtl)" } else { "" };
        output.push_str(&format!(
            " {} {:<10} {}{}\n",
            marker, option.code, option.display_name, direction
        ));
    }
    output
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, output: Output<'_>, _config: &Config) -> Result<String> {
        let text = match output {
            Output::Candidates(candidates) => candidate_lines(candidates),
            Output::Address(address) => address_block(address),
            Output::Article { article, languages } => {
                let mut text = article_block(&article.summary);
                if languages {
                    text.push_str("\nLanguages:\n");
                    text.push_str(&language_lines(
                        &article.languages,
                        &article.summary.language_code,
                    ));
                }
                text
            }
        };
        Ok(text)
    }
}
