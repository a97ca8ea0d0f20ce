//! Scrape boulder problems from catalog areas and post them to the server.

use anyhow::bail;
use boulder_cli::client::DEFAULT_SERVER_URL;
use boulder_cli::ServerClient;
use boulder_scraper::discovery::load_areas;
use boulder_scraper::{CatalogClient, RouteScraper, ScraperConfig};
use clap::Parser;
use std::path::PathBuf;

/// Populate the route store by scraping catalog areas
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Boulder server URL
    #[arg(long, env = "BOULDER_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// JSON file written by discover_areas
    #[arg(long)]
    areas: Option<PathBuf>,

    /// Area page to scrape; may be repeated
    #[arg(long = "area-url")]
    area_urls: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boulder_cli::init_logging();
    let args = Args::parse();

    let mut area_urls = args.area_urls;
    if let Some(path) = &args.areas {
        area_urls.extend(load_areas(path)?.into_iter().map(|a| a.url));
    }
    if area_urls.is_empty() {
        bail!("Nothing to scrape: pass --areas <file> or --area-url <url>");
    }

    let server = ServerClient::new(&args.server)?;
    let scraper = RouteScraper::new(CatalogClient::new(ScraperConfig::from_env())?);

    let mut added = 0usize;
    let mut failed = 0usize;
    for (i, area_url) in area_urls.iter().enumerate() {
        println!("[{}/{}] Scraping {}", i + 1, area_urls.len(), area_url);
        for scraped in scraper.area_routes(area_url).await {
            let name = scraped.name.clone();
            match server.add_route(&scraped.into_new_route()).await {
                Ok(route) => {
                    added += 1;
                    tracing::info!("Stored '{}' as route {}", route.name, route.id);
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Failed to store '{}': {:#}", name, e);
                }
            }
        }
    }

    println!("Added {} routes ({} failed)", added, failed);
    Ok(())
}
