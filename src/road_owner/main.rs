//! Prints the owner of the road nearest a coordinate.
//!
//! Reads `ARCGIS_API_KEY` from the environment (or `.env`), reprojects a small
//! search square into the roads layer's coordinate system and queries the layer
//! for one intersecting road.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use roadowner::arcgis::ArcGisClient;
use roadowner::config::{Config, Credential};
use roadowner::RoadFinder;

#[derive(Parser, Debug)]
#[command(name = "road-owner")]
#[command(about = "Report who owns the road nearest a coordinate")]
struct Args {
    /// Latitude in decimal degrees
    #[arg(long, default_value_t = 35.791766, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, default_value_t = -78.776689, allow_negative_numbers = true)]
    lon: f64,

    /// Optional TOML file overriding service endpoints
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verify the API key against the portal before the lookup
    #[arg(long)]
    check_key: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the owner
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    let credential = Credential::from_env()?;
    let client = ArcGisClient::connect(&config, credential)
        .context("Failed to set up ArcGIS session")?;

    if args.check_key {
        client
            .check_portal()
            .await
            .context("API key was rejected by the portal")?;
    }

    let finder = RoadFinder::from_config(&client, &config)?;
    info!("Looking up road near ({}, {})", args.lat, args.lon);

    let owner = finder
        .find_nearby_road_owner(args.lat, args.lon)
        .await
        .context("Road lookup failed")?;
    println!("{}", owner);

    Ok(())
}
