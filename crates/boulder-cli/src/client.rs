//! HTTP client for the boulder server API.

use anyhow::{bail, Context, Result};
use boulder_core::{AreaStatistics, Candidate, NewRoute, Route};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Body of `POST /api/recommend`. Unset fields use the server's defaults.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grades: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub holds: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_approach: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Candidate>,
    pub statistics: AreaStatistics,
}

#[derive(Debug, Deserialize)]
struct AddRouteResponse {
    route: Route,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Client for a running boulder server.
pub struct ServerClient {
    base_url: String,
    client: reqwest::Client,
}

impl ServerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Store a route, returning it with its server-assigned id.
    pub async fn add_route(&self, route: &NewRoute) -> Result<Route> {
        let url = format!("{}/api/add_route", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(route)
            .send()
            .await
            .with_context(|| format!("POST {}", url))?;

        let body: AddRouteResponse = Self::parse(response).await?;
        Ok(body.route)
    }

    pub async fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse> {
        let url = format!("{}/api/recommend", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("POST {}", url))?;

        Self::parse(response).await
    }

    async fn parse<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            bail!("Server returned {}: {}", status, message);
        }
        response.json().await.context("Invalid response body")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recommend_request_omits_unset_fields() {
        let request = RecommendRequest {
            latitude: Some(37.37),
            longitude: Some(-118.4),
            grades: vec!["V4".into()],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "latitude": 37.37, "longitude": -118.4, "grades": ["V4"] })
        );
    }

    #[test]
    fn new_route_posts_with_server_field_names() {
        let mut route = NewRoute::boulder("Scream", "V5");
        route.coordinates = boulder_core::Coordinates::from_raw(34.0142, -116.1672);
        route.first_ascent = Some("Unknown".into());

        let body = serde_json::to_value(&route).unwrap();
        assert_eq!(body["latitude"], 34.0142);
        assert_eq!(body["longitude"], -116.1672);
        assert_eq!(body["fa"], "Unknown");
    }

    #[test]
    fn recommend_response_reads_server_payload() {
        let payload = json!({
            "success": true,
            "recommendations": [{
                "id": 1,
                "name": "The Nose",
                "grade": "V4",
                "location": "Joshua Tree National Park, CA",
                "latitude": 34.0135,
                "longitude": -116.1669,
                "approach_distance": 0.5,
                "route_type": "boulder",
                "holds": ["crimps", "slopers"],
                "description": "",
                "url": "",
                "rating": 4.2,
                "height": 12.0,
                "fa": "Unknown",
                "created_at": "2024-01-01T00:00:00Z",
                "distance": 118.94,
                "recommendation_score": 23.53
            }],
            "statistics": { "total_routes": 0 }
        });

        let response: RecommendResponse = serde_json::from_value(payload).unwrap();
        assert_eq!(response.recommendations.len(), 1);
        let top = &response.recommendations[0];
        assert_eq!(top.route.name, "The Nose");
        assert!(top.route.coordinates.is_some());
        assert_eq!(top.recommendation_score, Some(23.53));
        assert_eq!(response.statistics.total_routes, 0);
        assert!(response.statistics.summary.is_none());
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let client = ServerClient::new("http://127.0.0.1:9/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
        let result = client.recommend(&RecommendRequest::default()).await;
        assert!(result.is_err());
    }
}
