//! Server configuration from environment.

use boulder_core::{Coordinates, ScoringWeights};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    /// Insert the bundled sample routes when the store is nearly empty
    pub seed_sample_data: bool,
    /// Query point when a request omits latitude/longitude
    pub default_location: Coordinates,
    pub default_max_approach: f64,
    pub default_radius: f64,
    pub default_limit: usize,
    pub weights: ScoringWeights,
}

impl Config {
    pub fn from_env() -> Self {
        let weights = ScoringWeights::default();
        Self {
            server_port: parse_env("BOULDER_PORT", 5000),
            database_path: env::var("BOULDER_DB_PATH")
                .unwrap_or_else(|_| "data/boulders.db".to_string()),
            database_max_connections: parse_env("BOULDER_DB_MAX_CONNECTIONS", 5),
            seed_sample_data: parse_env("BOULDER_SEED_SAMPLE_DATA", true),
            default_location: Coordinates {
                lat: parse_env("BOULDER_DEFAULT_LAT", 37.7749),
                lon: parse_env("BOULDER_DEFAULT_LON", -122.4194),
            },
            default_max_approach: parse_env("BOULDER_DEFAULT_MAX_APPROACH", 2.0),
            default_radius: parse_env("BOULDER_DEFAULT_RADIUS", 100.0),
            default_limit: parse_env("BOULDER_DEFAULT_LIMIT", 10),
            weights: ScoringWeights {
                rating: parse_env("BOULDER_WEIGHT_RATING", weights.rating),
                distance: parse_env("BOULDER_WEIGHT_DISTANCE", weights.distance),
                approach: parse_env("BOULDER_WEIGHT_APPROACH", weights.approach),
            },
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
