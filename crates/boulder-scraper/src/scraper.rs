//! Boulder problem scraping from catalog area pages.

use boulder_core::NewRoute;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::CatalogClient;
use crate::parse;

/// Fields read from one route page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedRoute {
    pub name: String,
    /// Grade label exactly as printed on the page
    pub grade: String,
    pub description: String,
    /// Breadcrumb trail, e.g. "California > Bishop Area Bouldering"
    pub location: String,
    pub url: String,
}

impl ScrapedRoute {
    /// Convert into an insert payload.
    ///
    /// Catalog pages carry no coordinates, holds or rating, so the record is
    /// unlocated and unrated until enriched elsewhere.
    pub fn into_new_route(self) -> NewRoute {
        let grade = parse::v_grade(&self.grade).unwrap_or_else(|| "VB".to_string());
        let mut route = NewRoute::boulder(self.name, grade);
        route.description = self.description;
        route.location = self.location;
        route.url = self.url;
        route
    }
}

/// Parse a route page, keeping only V-graded boulder problems.
pub fn parse_route_page(html: &str, url: &str) -> Option<ScrapedRoute> {
    let name = parse::title(html)?;
    let grade = parse::grade(html)?;
    if !parse::is_v_grade(&grade) {
        return None;
    }

    Some(ScrapedRoute {
        name,
        grade,
        description: parse::description(html),
        location: parse::breadcrumb(html),
        url: url.to_string(),
    })
}

pub struct RouteScraper {
    client: CatalogClient,
}

impl RouteScraper {
    pub fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Every boulder problem linked from an area page.
    pub async fn area_routes(&self, area_url: &str) -> Vec<ScrapedRoute> {
        let Some(html) = self.client.get_page(area_url).await else {
            return Vec::new();
        };

        let links = parse::route_links(&html);
        if links.is_empty() {
            warn!("No route links found at {}", area_url);
            return Vec::new();
        }

        let mut routes = Vec::new();
        for href in links {
            let Some(route_url) = self.client.absolute_url(&href) else {
                warn!("Skipping unresolvable link {}", href);
                continue;
            };
            if let Some(route) = self.route_page(&route_url).await {
                info!("Added boulder: {}", route.name);
                routes.push(route);
            }
        }
        routes
    }

    /// Fetch and parse one route page.
    pub async fn route_page(&self, url: &str) -> Option<ScrapedRoute> {
        let html = self.client.get_page(url).await?;
        let parsed = parse_route_page(&html, url);
        if parsed.is_none() {
            info!("Skipping {}: not a V-graded boulder page", url);
        }
        parsed
    }
}
