//! Ask the server for route recommendations and print them.

use boulder_cli::client::DEFAULT_SERVER_URL;
use boulder_cli::report::{format_recommendations, format_statistics};
use boulder_cli::{RecommendRequest, ServerClient};
use clap::Parser;

/// Print ranked boulder recommendations around a point
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Boulder server URL
    #[arg(long, env = "BOULDER_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Latitude (server default when omitted)
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude (server default when omitted)
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Acceptable grade; may be repeated
    #[arg(long = "grade")]
    grades: Vec<String>,

    /// Required hold type; may be repeated
    #[arg(long = "hold")]
    holds: Vec<String>,

    /// Maximum approach in miles
    #[arg(long)]
    max_approach: Option<f64>,

    /// Search radius in miles
    #[arg(long)]
    radius: Option<f64>,

    /// Number of routes to show
    #[arg(long)]
    limit: Option<i64>,

    /// Print the raw JSON response instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boulder_cli::init_logging();
    let args = Args::parse();

    let server = ServerClient::new(&args.server)?;
    let request = RecommendRequest {
        latitude: args.lat,
        longitude: args.lon,
        grades: args.grades,
        holds: args.holds,
        max_approach: args.max_approach,
        search_radius: args.radius,
        limit: args.limit,
    };

    let response = server.recommend(&request).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&response.recommendations)?);
        println!("{}", serde_json::to_string_pretty(&response.statistics)?);
        return Ok(());
    }

    print!("{}", format_recommendations(&response.recommendations));
    println!();
    print!("{}", format_statistics(&response.statistics));
    Ok(())
}
