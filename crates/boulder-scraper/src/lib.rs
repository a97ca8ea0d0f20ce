//! Ingestion for the route store.
//!
//! Fetches pages from a climbing-route catalog, extracts route records, crawls
//! the area hierarchy for bouldering areas and reads the catalog's data API.
//! Everything here only produces [`boulder_core::NewRoute`] values; storing
//! them is the caller's job.

pub mod backoff;
pub mod client;
pub mod config;
pub mod discovery;
pub mod mp_api;
pub mod parse;
pub mod scraper;

pub use client::CatalogClient;
pub use config::ScraperConfig;
pub use discovery::{AreaDiscovery, DiscoveredArea};
pub use mp_api::{ApiRoute, MountainProjectApi};
pub use scraper::{RouteScraper, ScrapedRoute};
