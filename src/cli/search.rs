//! Search command handler
//!
//! Forward geocodes a place name.

use crate::config::Config;
use crate::error::Result;
use crate::format::Output;
use crate::geo::{get_geocoder, GeoSearch};
use clap::Args;
use tracing::debug;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Place name to search for
    #[arg(required_unless_present = "list_formats")]
    pub query: Vec<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Map provider for url output
    #[arg(long)]
    pub provider: Option<String>,

    /// Show at most this many results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    if args.list_formats {
        super::list_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let query = args.query.join(" ");

    let mut candidates = if query.trim().chars().count() < config.search.min_chars {
        debug!(query = %query, "query below minimum length, not searching");
        Vec::new()
    } else {
        get_geocoder(&config.providers)?.search(query.trim()).await?
    };

    if let Some(limit) = args.limit {
        candidates.truncate(limit);
    }

    let output = super::render(
        Output::Candidates(&candidates),
        args.format.as_deref(),
        args.provider.as_deref(),
        &config,
    )?;
    println!("{}", output.trim_end());

    Ok(())
}
