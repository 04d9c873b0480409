//! Here command handler
//!
//! Resolves the current position through the configured source, then looks
//! up its address.

use crate::config::Config;
use crate::error::Result;
use crate::format::Output;
use crate::geo::position::{ConfiguredPosition, PositionSource};
use crate::geo::{get_geocoder, GeoSearch};
use clap::Args;

/// Here command arguments
#[derive(Args)]
pub struct HereArgs {
    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Map provider for url output
    #[arg(long)]
    pub provider: Option<String>,
}

/// Run the here command
pub async fn run(args: HereArgs) -> Result<()> {
    let config = Config::load()?;
    let position = ConfiguredPosition::from_config(&config.location, &config.providers)?;

    let coordinate = position.current_position().await?;
    eprintln!("Current position: {}", coordinate);

    let address = get_geocoder(&config.providers)?
        .reverse_lookup(coordinate)
        .await?;

    let output = super::render(
        Output::Address(&address),
        args.format.as_deref(),
        args.provider.as_deref(),
        &config,
    )?;
    println!("{}", output.trim_end());

    Ok(())
}
