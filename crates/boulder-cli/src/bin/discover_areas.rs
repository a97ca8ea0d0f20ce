//! Crawl the route catalog for bouldering areas and save them as JSON.

use boulder_scraper::discovery::DEFAULT_START_PATH;
use boulder_scraper::{AreaDiscovery, CatalogClient, ScraperConfig};
use clap::Parser;
use std::path::PathBuf;

/// Discover bouldering areas by crawling the catalog's area hierarchy
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Page to start crawling from (default: the catalog's route guide)
    #[arg(long)]
    start_url: Option<String>,

    /// Where to write the discovered areas
    #[arg(long, default_value = "bouldering_areas.json")]
    output: PathBuf,

    /// Stop after visiting this many pages
    #[arg(long, default_value_t = 100)]
    max_pages: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boulder_cli::init_logging();
    let args = Args::parse();

    let config = ScraperConfig::from_env();
    let start_url = args
        .start_url
        .unwrap_or_else(|| format!("{}{}", config.base_url, DEFAULT_START_PATH));

    let mut discovery = AreaDiscovery::new(CatalogClient::new(config)?);
    println!("Crawling from {} (max {} pages)...", start_url, args.max_pages);

    let found = discovery.discover(&start_url, args.max_pages).await.len();
    discovery.save_areas(&args.output)?;

    println!("Found {} bouldering areas, saved to {}", found, args.output.display());
    Ok(())
}
