//! Boulder CLI - command line tools for the boulder server.
//!
//! Binaries:
//! - discover_areas: crawl the catalog for bouldering areas
//! - populate_db: scrape areas and post their routes to the server
//! - fetch_nearby: import routes around a point from the data API
//! - recommend: query the server and print ranked routes

pub mod client;
pub mod report;

pub use client::{RecommendRequest, RecommendResponse, ServerClient};

/// Install a plain fmt subscriber honoring `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
