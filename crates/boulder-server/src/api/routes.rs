//! REST API routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use boulder_core::{Coordinates, NewRoute, Route};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::recommend;
use crate::config::Config;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(_config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/recommend", post(recommend::recommend))
        .route("/api/statistics", get(recommend::statistics))
        .route("/api/add_route", post(add_route))
        .route("/api/routes/:id", get(get_route))
}

/// Body of `POST /api/add_route`. A zero rating or height means unknown.
#[derive(Debug, Deserialize)]
pub struct AddRouteRequest {
    pub name: String,
    pub grade: String,
    #[serde(default)]
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub approach_distance: f64,
    #[serde(default)]
    pub holds: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    pub rating: Option<f64>,
    pub height: Option<f64>,
    pub fa: Option<String>,
}

impl From<AddRouteRequest> for NewRoute {
    fn from(req: AddRouteRequest) -> Self {
        let coordinates = match (req.latitude, req.longitude) {
            (Some(lat), Some(lon)) => Coordinates::from_raw(lat, lon),
            _ => None,
        };

        let mut route = NewRoute::boulder(req.name, req.grade);
        route.location = req.location;
        route.coordinates = coordinates;
        route.approach_distance = req.approach_distance;
        route.holds = req.holds;
        route.description = req.description;
        route.url = req.url;
        route.rating = req.rating.filter(|r| *r != 0.0);
        route.height = req.height.filter(|h| *h != 0.0);
        route.first_ascent = req.fa;
        route
    }
}

#[derive(Debug, Serialize)]
pub struct AddRouteResponse {
    pub success: bool,
    pub message: String,
    pub route: Route,
}

/// Append a route to the store.
pub async fn add_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddRouteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddRouteResponse>), ApiError> {
    let Json(req) = payload?;
    let route = state.add_route(req.into()).await?;
    tracing::info!("Added route {} '{}' ({})", route.id, route.name, route.grade);

    Ok((
        StatusCode::CREATED,
        Json(AddRouteResponse {
            success: true,
            message: format!("Route '{}' added successfully", route.name),
            route,
        }),
    ))
}

/// Get a stored route by id.
pub async fn get_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Route>, ApiError> {
    state
        .get_route(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Route {} not found", id)))
}
