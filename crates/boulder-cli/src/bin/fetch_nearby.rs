//! Import boulder problems around a point from the catalog's data API.

use boulder_cli::client::DEFAULT_SERVER_URL;
use boulder_cli::ServerClient;
use boulder_scraper::MountainProjectApi;
use clap::Parser;

/// Fetch nearby boulders from the data API and post them to the server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Data API key
    #[arg(long, env = "MP_API_KEY")]
    api_key: String,

    /// Center latitude (default: Bishop, CA)
    #[arg(long, allow_hyphen_values = true, default_value_t = 37.3635)]
    lat: f64,

    /// Center longitude (default: Bishop, CA)
    #[arg(long, allow_hyphen_values = true, default_value_t = -118.3951)]
    lon: f64,

    /// Search radius in miles
    #[arg(long, default_value_t = 50.0)]
    radius: f64,

    /// Maximum routes to request
    #[arg(long, default_value_t = 500)]
    max_results: u32,

    /// Boulder server URL
    #[arg(long, env = "BOULDER_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boulder_cli::init_logging();
    let args = Args::parse();

    let api = MountainProjectApi::new(args.api_key)?;
    let server = ServerClient::new(&args.server)?;

    println!(
        "Fetching boulders within {} mi of ({}, {})...",
        args.radius, args.lat, args.lon
    );
    let routes = api
        .routes_near(args.lat, args.lon, args.radius, args.max_results)
        .await?;
    println!("Data API returned {} routes", routes.len());

    let mut added = 0usize;
    for api_route in routes {
        let new_route = api_route.into_new_route();
        match server.add_route(&new_route).await {
            Ok(route) => {
                added += 1;
                tracing::info!("Stored '{}' ({}) as route {}", route.name, route.grade, route.id);
            }
            Err(e) => tracing::warn!("Failed to store '{}': {:#}", new_route.name, e),
        }
    }

    println!("Added {} routes to {}", added, server.base_url());
    Ok(())
}
