//! Breadth-first crawl of the catalog's area hierarchy for bouldering areas.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use tracing::info;

use crate::client::CatalogClient;
use crate::parse;

pub const DEFAULT_START_PATH: &str = "/route-guide";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredArea {
    pub name: String,
    pub url: String,
}

pub struct AreaDiscovery {
    client: CatalogClient,
    visited: HashSet<String>,
    areas: Vec<DiscoveredArea>,
}

impl AreaDiscovery {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            visited: HashSet::new(),
            areas: Vec::new(),
        }
    }

    /// Crawl from `start_url`, visiting at most `max_pages` pages.
    ///
    /// Pages that fail to load are skipped and not retried later.
    pub async fn discover(&mut self, start_url: &str, max_pages: usize) -> &[DiscoveredArea] {
        let mut queue = VecDeque::from([start_url.to_string()]);

        while let Some(current) = queue.pop_front() {
            if self.visited.len() >= max_pages {
                info!("Page budget of {} reached, stopping crawl", max_pages);
                break;
            }
            if !self.visited.insert(current.clone()) {
                continue;
            }

            info!("Exploring {}", current);
            let Some(html) = self.client.get_page(&current).await else {
                continue;
            };

            if let Some(area) = classify_page(&html, &current) {
                info!("Found bouldering area: {}", area.name);
                self.areas.push(area);
            }

            for href in parse::area_links(&html) {
                if let Some(url) = self.client.absolute_url(&href) {
                    if !self.visited.contains(&url) {
                        queue.push_back(url);
                    }
                }
            }
        }

        &self.areas
    }

    pub fn areas(&self) -> &[DiscoveredArea] {
        &self.areas
    }

    /// Write discovered areas as pretty JSON.
    pub fn save_areas(&self, path: impl AsRef<Path>) -> Result<()> {
        save_areas(&self.areas, path)
    }
}

/// The area record for a page, if the page is a bouldering area.
pub fn classify_page(html: &str, url: &str) -> Option<DiscoveredArea> {
    if !parse::is_bouldering_area(html) {
        return None;
    }
    Some(DiscoveredArea {
        name: parse::title(html).unwrap_or_else(|| "Unknown Area".to_string()),
        url: url.to_string(),
    })
}

pub fn save_areas(areas: &[DiscoveredArea], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(areas)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved {} areas to {}", areas.len(), path.display());
    Ok(())
}

pub fn load_areas(path: impl AsRef<Path>) -> Result<Vec<DiscoveredArea>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid area list in {}", path.display()))
}
