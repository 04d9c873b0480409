//! Reverse command handler

use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::Result;
use crate::format::Output;
use crate::geo::{get_geocoder, GeoSearch};
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Map provider for url output
    #[arg(long)]
    pub provider: Option<String>,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let config = Config::load()?;
    let coordinate = Coordinate::new(args.lat, args.lon)?;

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
