//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod article;
pub mod config;
pub mod explore;
pub mod here;
pub mod reverse;
pub mod search;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::format::{available_formats, get_formatter, Output};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Place search, reverse geocoding and Wikipedia summaries
#[derive(Parser)]
#[command(name = "placescope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for places by name
    Search(search::SearchArgs),

    /// Look up the address of a coordinate
    Reverse(reverse::ReverseArgs),

    /// Show the Wikipedia summary for a place name
    Article(article::ArticleArgs),

    /// Show the address of your current position
    Here(here::HereArgs),

    /// Interactive session: search, pick, read
    Explore(explore::ExploreArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Article(args) => article::run(args).await,
        Commands::Here(args) => here::run(args).await,
        Commands::Explore(args) => explore::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Log to stderr so stdout only carries command output
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("placescope=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Format `output` with the named (or configured) format
///
/// `provider` overrides the map provider for the url format.
pub(crate) fn render(
    output: Output<'_>,
    format: Option<&str>,
    provider: Option<&str>,
    config: &Config,
) -> Result<String> {
    let format = format.unwrap_or(&config.output.format);
    if format.eq_ignore_ascii_case("url") {
        return UrlFormatter.format_with_provider(output, config, provider);
    }

    let formatter = get_formatter(format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
    formatter.format(output, config)
}

/// Print available output formats
pub(crate) fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::address;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_article_command() {
        let cli = Cli::parse_from(["placescope", "article", "New", "York", "--lang", "de"]);
        match cli.command {
            Commands::Article(args) => {
                assert_eq!(args.term, vec!["New", "York"]);
                assert_eq!(args.lang.as_deref(), Some("de"));
            }
            _ => panic!("expected article command"),
        }
    }

    #[test]
    fn test_render_uses_configured_format() {
        let mut config = Config::default();
        let paris = address(1, "Paris", 48.85, 2.35);

        let text = render(Output::Address(&paris), None, None, &config).unwrap();
        assert!(text.starts_with("Paris\n"));

        config.output.format = "json".to_string();
        let json = render(Output::Address(&paris), None, None, &config).unwrap();
        assert!(json.starts_with('{'));

        let url = render(Output::Address(&paris), Some("url"), Some("apple"), &config).unwrap();
        assert_eq!(url, "https://maps.apple.com/?ll=48.85,2.35");

        assert!(matches!(
            render(Output::Address(&paris), Some("gpx"), None, &config),
            Err(Error::Config(_))
        ));
    }
}
