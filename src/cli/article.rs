//! Article command handler
//!
//! Resolves a place name to its Wikipedia summary.

use crate::article::{get_encyclopedia, ArticleResolver, ResolutionPhase};
use crate::config::Config;
use crate::error::Result;
use crate::format::Output;
use clap::Args;
use std::sync::Arc;

/// Article command arguments
#[derive(Args)]
pub struct ArticleArgs {
    /// Place name to look up
    #[arg(required = true)]
    pub term: Vec<String>,

    /// Wikipedia language code (default from config)
    #[arg(long, short = 'l')]
    pub lang: Option<String>,

    /// Also list the languages the article is available in
    #[arg(long)]
    pub languages: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,
}

/// Run the article command
pub async fn run(args: ArticleArgs) -> Result<()> {
    let config = Config::load()?;
    let term = args.term.join(" ");
    let language = args.lang.unwrap_or_else(|| config.article.language.clone());

    let resolver = ArticleResolver::new(Arc::new(get_encyclopedia(&config.providers)?));
    let article = resolver
        .resolve_observed(&term, &language, |phase| {
            if phase == ResolutionPhase::PageLoading {
                eprintln!("Loading article...");
            }
        })
        .await?;

    let output = super::render(
        Output::Article {
            article: &article,
            languages: args.languages,
        },
        args.format.as_deref(),
        None,
        &config,
    )?;
    println!("{}", output.trim_end());

    Ok(())
}
