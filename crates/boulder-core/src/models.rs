//! Core data models for bouldering routes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "latitude")]
    pub lat: f64,
    #[serde(rename = "longitude")]
    pub lon: f64,
}

impl Coordinates {
    /// Build a validated position.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        let coords = Self { lat, lon };
        match coords.validate() {
            Some(problem) => Err(CoreError::invalid(problem)),
            None => Ok(coords),
        }
    }

    /// Interpret raw ingestion values, where `(0, 0)` marks an unlocated record.
    pub fn from_raw(lat: f64, lon: f64) -> Option<Self> {
        if lat == 0.0 && lon == 0.0 {
            None
        } else {
            Some(Self { lat, lon })
        }
    }

    fn validate(&self) -> Option<String> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Some(format!(
                "coordinates must be finite (got {}, {})",
                self.lat, self.lon
            ));
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Some(format!("latitude {} outside [-90, 90]", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Some(format!("longitude {} outside [-180, 180]", self.lon));
        }
        None
    }
}

/// A persisted bouldering route. Records are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: i64,
    pub name: String,
    /// Difficulty label, e.g. "V4". Compared by exact string equality.
    pub grade: String,
    /// Free-text place description
    pub location: String,
    /// Absent for records without a known position
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,
    /// Distance from parking/trailhead to the route, in miles
    pub approach_distance: f64,
    pub route_type: String,
    pub holds: Vec<String>,
    pub description: String,
    pub url: String,
    /// Star rating, conventionally 0-5
    pub rating: Option<f64>,
    /// Height in feet
    pub height: Option<f64>,
    #[serde(rename = "fa")]
    pub first_ascent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Attach identity and creation time to an insert payload.
    pub fn from_new(id: i64, route: NewRoute, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: route.name,
            grade: route.grade,
            location: route.location,
            coordinates: route.coordinates,
            approach_distance: route.approach_distance,
            route_type: route.route_type,
            holds: route.holds,
            description: route.description,
            url: route.url,
            rating: route.rating,
            height: route.height,
            first_ascent: route.first_ascent,
            created_at,
        }
    }

    /// Check whether the route carries every hold in `wanted`.
    pub fn has_all_holds(&self, wanted: &[String]) -> bool {
        wanted.iter().all(|hold| self.holds.contains(hold))
    }
}

/// Insert payload for a route; identity and timestamp come from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoute {
    pub name: String,
    pub grade: String,
    #[serde(default)]
    pub location: String,
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub approach_distance: f64,
    #[serde(default = "default_route_type")]
    pub route_type: String,
    #[serde(default)]
    pub holds: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default, rename = "fa")]
    pub first_ascent: Option<String>,
}

fn default_route_type() -> String {
    "boulder".to_string()
}

impl NewRoute {
    /// Minimal boulder record; remaining fields start empty.
    pub fn boulder(name: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grade: grade.into(),
            location: String::new(),
            coordinates: None,
            approach_distance: 0.0,
            route_type: default_route_type(),
            holds: Vec::new(),
            description: String::new(),
            url: String::new(),
            rating: None,
            height: None,
            first_ascent: None,
        }
    }

    /// Validate the record.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Route name must not be empty".to_string());
        }

        if let Some(problem) = self.coordinates.as_ref().and_then(Coordinates::validate) {
            errors.push(problem);
        }

        if !self.approach_distance.is_finite() || self.approach_distance < 0.0 {
            errors.push(format!(
                "Approach distance must be a non-negative number (got {})",
                self.approach_distance
            ));
        }

        if let Some(rating) = self.rating {
            if !rating.is_finite() {
                errors.push("Rating must be finite".to_string());
            }
        }

        if let Some(height) = self.height {
            if !height.is_finite() || height <= 0.0 {
                errors.push(format!("Height must be positive (got {})", height));
            }
        }

        errors
    }

    /// Check if the record is valid.
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// A route annotated for one query. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub route: Route,
    /// Great-circle distance from the query point, in miles
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_score: Option<f64>,
}

impl Candidate {
    pub fn new(route: Route, distance: f64) -> Self {
        Self {
            route,
            distance,
            recommendation_score: None,
        }
    }
}
