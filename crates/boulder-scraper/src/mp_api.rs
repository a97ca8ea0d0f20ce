//! Mountain Project data API client.

use anyhow::{Context, Result};
use boulder_core::{Coordinates, NewRoute};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://www.mountainproject.com/data";

/// Hold keywords recognised in route descriptions.
const KNOWN_HOLDS: [&str; 7] = [
    "crimps",
    "jugs",
    "slopers",
    "pinches",
    "pockets",
    "sidepulls",
    "underclings",
];

/// The API gives no approach information; every route gets this placeholder.
const PLACEHOLDER_APPROACH: f64 = 0.1;

/// Route record as returned by the data API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoute {
    pub id: i64,
    pub name: String,
    /// Grade label, e.g. "V1-2"
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub stars: Option<f64>,
    /// Area hierarchy, outermost first
    #[serde(default)]
    pub location: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub fa: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoutesResponse {
    routes: Vec<ApiRoute>,
}

pub struct MountainProjectApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MountainProjectApi {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Boulder problems within `max_distance` miles of a point.
    pub async fn routes_near(
        &self,
        lat: f64,
        lon: f64,
        max_distance: f64,
        max_results: u32,
    ) -> Result<Vec<ApiRoute>> {
        let url = format!("{}/get-routes-for-lat-lon", self.base_url);
        let params = [
            ("key", self.api_key.clone()),
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("maxDistance", max_distance.to_string()),
            ("maxResults", max_results.to_string()),
            ("type", "boulder".to_string()),
        ];

        let routes = self.fetch_routes(&url, &params).await?;
        debug!("Data API returned {} routes near ({}, {})", routes.len(), lat, lon);
        Ok(routes)
    }

    /// Details for a single route.
    pub async fn route_by_id(&self, route_id: i64) -> Result<ApiRoute> {
        let url = format!("{}/get-routes", self.base_url);
        let params = [
            ("key", self.api_key.clone()),
            ("routeIds", route_id.to_string()),
        ];

        self.fetch_routes(&url, &params)
            .await?
            .into_iter()
            .next()
            .with_context(|| format!("Route {} not found", route_id))
    }

    async fn fetch_routes(&self, url: &str, params: &[(&str, String)]) -> Result<Vec<ApiRoute>> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .context("Failed to reach data API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Data API request failed: {} {}", status, body));
        }

        let payload = response
            .json::<RoutesResponse>()
            .await
            .context("Failed to parse data API response")?;
        Ok(payload.routes)
    }
}

impl ApiRoute {
    /// Convert into an insert payload.
    pub fn into_new_route(self) -> NewRoute {
        let holds = holds_in(&self.description);
        let mut route = NewRoute::boulder(self.name, first_grade_of_range(&self.rating));
        route.location = self.location.last().cloned().unwrap_or_default();
        route.coordinates = Coordinates::from_raw(self.latitude, self.longitude);
        route.approach_distance = PLACEHOLDER_APPROACH;
        route.holds = holds;
        route.description = self.description;
        route.url = self.url;
        route.rating = self.stars.filter(|stars| *stars > 0.0);
        route.height = self.height.filter(|height| *height > 0.0);
        route.first_ascent = self.fa.filter(|fa| !fa.trim().is_empty());
        route
    }
}

/// Lower end of a grade range: "V1-2" -> "V1".
fn first_grade_of_range(grade: &str) -> String {
    grade.split('-').next().unwrap_or_default().trim().to_string()
}

/// Hold keywords mentioned in a description, in keyword order.
fn holds_in(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    KNOWN_HOLDS
        .iter()
        .filter(|hold| lower.contains(*hold))
        .map(|hold| hold.to_string())
        .collect()
}
