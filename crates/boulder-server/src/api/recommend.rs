//! Recommendation and area statistics endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use boulder_core::{AreaStatistics, Candidate, Coordinates, RecommendationQuery};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::config::Config;
use crate::state::AppState;

/// Body of `POST /api/recommend`. Omitted fields fall back to server defaults.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub grades: Vec<String>,
    #[serde(default)]
    pub holds: Vec<String>,
    pub max_approach: Option<f64>,
    pub search_radius: Option<f64>,
    pub limit: Option<i64>,
}

impl RecommendRequest {
    fn into_query(self, config: &Config) -> Result<RecommendationQuery, ApiError> {
        let location = resolve_location(config, self.latitude, self.longitude)?;
        Ok(RecommendationQuery {
            location,
            grades: self.grades,
            holds: self.holds,
            max_approach: self.max_approach.unwrap_or(config.default_max_approach),
            radius: self.search_radius.unwrap_or(config.default_radius),
            limit: self
                .limit
                .map(|l| l.max(0) as usize)
                .unwrap_or(config.default_limit),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub recommendations: Vec<Candidate>,
    pub statistics: AreaStatistics,
}

#[derive(Debug, Deserialize)]
pub struct StatisticsParams {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub search_radius: Option<f64>,
}

fn resolve_location(
    config: &Config,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Coordinates, ApiError> {
    let lat = latitude.unwrap_or(config.default_location.lat);
    let lon = longitude.unwrap_or(config.default_location.lon);
    Ok(Coordinates::new(lat, lon)?)
}

/// Ranked recommendations plus statistics for the surrounding area.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let Json(req) = payload?;
    let query = req.into_query(state.config())?;

    let recommender = state.recommender();
    let recommendations = recommender.recommend(&query)?;
    let statistics = recommender.statistics(&query.location, query.radius)?;

    tracing::debug!(
        "Recommend at ({:.4}, {:.4}) r={} -> {} of {} routes",
        query.location.lat,
        query.location.lon,
        query.radius,
        recommendations.len(),
        statistics.total_routes
    );

    Ok(Json(RecommendResponse {
        success: true,
        recommendations,
        statistics,
    }))
}

/// Statistics only, for a map view that does not need the ranked list.
pub async fn statistics(
    State(state): State<Arc<AppState>>,
    params: Result<Query<StatisticsParams>, QueryRejection>,
) -> Result<Json<AreaStatistics>, ApiError> {
    let Query(params) = params?;
    let config = state.config();
    let location = resolve_location(config, params.latitude, params.longitude)?;
    let radius = params.search_radius.unwrap_or(config.default_radius);

    Ok(Json(state.recommender().statistics(&location, radius)?))
}
