//! placescope CLI entry point
//!
//! Place search, reverse geocoding and Wikipedia summaries

use placescope::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
