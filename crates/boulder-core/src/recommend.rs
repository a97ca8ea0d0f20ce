//! Recommendation pipeline: proximity search, preference filtering, scoring
//! and ranking, plus area statistics over the same proximity search.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::error::CoreError;
use crate::filter::{Preferences, DEFAULT_MAX_APPROACH};
use crate::models::{Candidate, Coordinates};
use crate::scoring::ScoringWeights;
use crate::spatial::{beyond_latitude_band, distance_miles};
use crate::stats::AreaStatistics;
use crate::store::RouteStore;

pub const DEFAULT_SEARCH_RADIUS: f64 = 50.0;
pub const DEFAULT_LIMIT: usize = 10;

/// Inputs for one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationQuery {
    pub location: Coordinates,
    #[serde(default)]
    pub grades: Vec<String>,
    #[serde(default)]
    pub holds: Vec<String>,
    #[serde(default = "default_max_approach")]
    pub max_approach: f64,
    /// Search radius in miles
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_max_approach() -> f64 {
    DEFAULT_MAX_APPROACH
}

fn default_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl RecommendationQuery {
    /// Query around `location` with every other parameter at its default.
    pub fn at(location: Coordinates) -> Self {
        Self {
            location,
            grades: Vec::new(),
            holds: Vec::new(),
            max_approach: DEFAULT_MAX_APPROACH,
            radius: DEFAULT_SEARCH_RADIUS,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::new(self.max_approach, self.grades.clone(), self.holds.clone())
    }
}

/// Runs recommendation and statistics queries against an injected store.
pub struct Recommender<'a, S: RouteStore + ?Sized> {
    store: &'a S,
    weights: ScoringWeights,
}

impl<'a, S: RouteStore + ?Sized> Recommender<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_weights(store, ScoringWeights::default())
    }

    pub fn with_weights(store: &'a S, weights: ScoringWeights) -> Self {
        Self { store, weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Located routes within `radius` miles of `center`, closest first.
    pub fn near(&self, center: &Coordinates, radius: f64) -> Result<Vec<Candidate>, CoreError> {
        check_center(center)?;
        check_radius(radius)?;

        let routes = self.store.located_routes()?;
        let scanned = routes.len();

        let mut candidates: Vec<Candidate> = routes
            .into_iter()
            .filter_map(|route| {
                let position = route.coordinates?;
                if beyond_latitude_band(center.lat, position.lat, radius) {
                    return None;
                }
                let distance = distance_miles(center, &position);
                (distance <= radius).then(|| Candidate::new(route, distance))
            })
            .collect();

        candidates.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));

        debug!(
            scanned,
            matched = candidates.len(),
            radius,
            "proximity search around ({}, {})",
            center.lat,
            center.lon
        );
        Ok(candidates)
    }

    /// Ranked recommendations, at most `query.limit` long.
    pub fn recommend(&self, query: &RecommendationQuery) -> Result<Vec<Candidate>, CoreError> {
        let preferences = query.preferences();
        preferences.check()?;

        let nearby = self.near(&query.location, query.radius)?;
        let mut ranked = preferences.apply(nearby);
        for candidate in &mut ranked {
            candidate.recommendation_score = Some(self.weights.score(candidate));
        }

        // Stable: equal scores keep their distance order.
        ranked.sort_by(|a, b| {
            let a = a.recommendation_score.unwrap_or(f64::NEG_INFINITY);
            let b = b.recommendation_score.unwrap_or(f64::NEG_INFINITY);
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });
        ranked.truncate(query.limit);

        debug!(returned = ranked.len(), limit = query.limit, "ranked recommendations");
        Ok(ranked)
    }

    /// Aggregates over every route within range, ignoring preferences.
    pub fn statistics(&self, center: &Coordinates, radius: f64) -> Result<AreaStatistics, CoreError> {
        let nearby = self.near(center, radius)?;
        Ok(AreaStatistics::from_candidates(&nearby))
    }
}

fn check_center(center: &Coordinates) -> Result<(), CoreError> {
    Coordinates::new(center.lat, center.lon).map(|_| ())
}

fn check_radius(radius: f64) -> Result<(), CoreError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(CoreError::invalid(format!(
            "search radius must be a non-negative number (got {})",
            radius
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{NewRoute, Route};
    use crate::store::MemoryRouteStore;

    const LOS_ANGELES: Coordinates = Coordinates {
        lat: 34.0522,
        lon: -118.2437,
    };

    fn boulder(
        name: &str,
        grade: &str,
        at: Option<(f64, f64)>,
        approach: f64,
        holds: &[&str],
        rating: Option<f64>,
    ) -> NewRoute {
        let mut route = NewRoute::boulder(name, grade);
        route.coordinates = at.map(|(lat, lon)| Coordinates { lat, lon });
        route.approach_distance = approach;
        route.holds = holds.iter().map(|h| h.to_string()).collect();
        route.rating = rating;
        route
    }

    fn sample_store() -> MemoryRouteStore {
        let store = MemoryRouteStore::new();
        let routes = [
            boulder("The Nose", "V4", Some((34.0135, -116.1669)), 0.5, &["crimps", "slopers"], Some(4.2)),
            boulder("Midnight Lightning", "V8", Some((37.7749, -119.4194)), 1.2, &["slopers", "mantles"], Some(4.8)),
            boulder("Buttermilk Traverse", "V2", Some((37.3719, -118.4064)), 0.3, &["jugs", "crimps"], Some(3.9)),
            boulder("Scream", "V5", Some((34.0142, -116.1672)), 0.8, &["crimps", "pinches"], Some(4.1)),
            boulder("Hobbit Hole", "V3", Some((39.0968, -120.0324)), 1.5, &["jugs", "slopers"], Some(4.0)),
            boulder("The Mandala", "V12", Some((37.3722, -118.4061)), 0.7, &["crimps", "slopers"], Some(4.9)),
            boulder("Lost Problem", "V1", None, 0.1, &["jugs"], Some(5.0)),
        ];
        for route in routes {
            store.insert(route).unwrap();
        }
        store
    }

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.route.name.as_str()).collect()
    }

    struct DownStore;

    impl RouteStore for DownStore {
        fn insert(&self, _route: NewRoute) -> Result<Route, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }

        fn located_routes(&self) -> Result<Vec<Route>, StoreError> {
            Err(StoreError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn near_is_sorted_and_within_radius() {
        let store = sample_store();
        let recommender = Recommender::new(&store);

        let nearby = recommender.near(&LOS_ANGELES, 300.0).unwrap();
        assert_eq!(nearby.len(), 5);
        assert!(nearby.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(nearby.iter().all(|c| c.distance <= 300.0));
        assert_eq!(nearby[0].route.name, "Scream");
        assert_eq!(nearby[1].route.name, "The Nose");
    }

    #[test]
    fn route_exactly_on_the_radius_is_included() {
        let store = MemoryRouteStore::new();
        store
            .insert(boulder("Edge", "V0", Some((-79.5453, 10.0)), 0.1, &[], None))
            .unwrap();
        let center = Coordinates { lat: -79.8467, lon: 10.0 };
        let radius = crate::spatial::haversine_miles(center.lat, center.lon, -79.5453, 10.0);

        let nearby = Recommender::new(&store).near(&center, radius).unwrap();
        assert_eq!(names(&nearby), vec!["Edge"]);
        assert_eq!(nearby[0].distance, radius);
    }

    #[test]
    fn near_is_monotonic_in_radius() {
        let store = sample_store();
        let recommender = Recommender::new(&store);

        let radii = [0.0, 50.0, 119.0, 230.0, 270.0, 1000.0];
        for pair in radii.windows(2) {
            let small = recommender.near(&LOS_ANGELES, pair[0]).unwrap();
            let large = recommender.near(&LOS_ANGELES, pair[1]).unwrap();
            for candidate in &small {
                assert!(
                    large.iter().any(|c| c.route.id == candidate.route.id),
                    "{} missing at radius {}",
                    candidate.route.name,
                    pair[1]
                );
            }
        }
    }

    #[test]
    fn unlocated_routes_never_match() {
        let store = sample_store();
        let recommender = Recommender::new(&store);

        for radius in [0.0, 10.0, 25_000.0] {
            let nearby = recommender
                .near(&Coordinates { lat: 0.0, lon: 0.0 }, radius)
                .unwrap();
            assert!(nearby.iter().all(|c| c.route.name != "Lost Problem"));
        }
        let everything = recommender.near(&LOS_ANGELES, 25_000.0).unwrap();
        assert_eq!(everything.len(), 6);
    }

    #[test]
    fn zero_radius_or_empty_store_is_empty_not_error() {
        let store = sample_store();
        let recommender = Recommender::new(&store);
        assert!(recommender.near(&LOS_ANGELES, 0.0).unwrap().is_empty());

        let empty = MemoryRouteStore::new();
        assert!(Recommender::new(&empty).near(&LOS_ANGELES, 100.0).unwrap().is_empty());
    }

    #[test]
    fn zero_radius_keeps_co_located_route() {
        let store = sample_store();
        let recommender = Recommender::new(&store);
        let at_scream = Coordinates { lat: 34.0142, lon: -116.1672 };
        assert_eq!(names(&recommender.near(&at_scream, 0.0).unwrap()), vec!["Scream"]);
    }

    #[test]
    fn malformed_input_is_rejected() {
        let store = sample_store();
        let recommender = Recommender::new(&store);

        let bad_center = Coordinates { lat: f64::NAN, lon: 0.0 };
        assert!(matches!(
            recommender.near(&bad_center, 10.0),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            recommender.near(&LOS_ANGELES, -1.0),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            recommender.statistics(&LOS_ANGELES, f64::INFINITY),
            Err(CoreError::InvalidInput(_))
        ));

        let mut query = RecommendationQuery::at(LOS_ANGELES);
        query.max_approach = -2.0;
        assert!(matches!(
            recommender.recommend(&query),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn store_failure_propagates_unchanged() {
        let recommender = Recommender::new(&DownStore);
        let err = recommender.near(&LOS_ANGELES, 10.0).unwrap_err();
        assert_eq!(
            err,
            CoreError::Store(StoreError::Unavailable("offline".into()))
        );
    }

    #[test]
    fn approach_ceiling_excludes_long_walks() {
        let store = MemoryRouteStore::new();
        store
            .insert(boulder("The Nose", "V4", Some((34.0135, -116.1669)), 0.5, &["crimps", "slopers"], Some(4.2)))
            .unwrap();
        store
            .insert(boulder("Midnight Lightning", "V8", Some((34.02, -116.17)), 1.2, &["slopers", "mantles"], Some(4.8)))
            .unwrap();
        let recommender = Recommender::new(&store);

        let mut query = RecommendationQuery::at(Coordinates { lat: 34.0, lon: -116.0 });
        query.max_approach = 1.0;
        let ranked = recommender.recommend(&query).unwrap();
        assert_eq!(names(&ranked), vec!["The Nose"]);
    }

    #[test]
    fn recommendations_are_ranked_and_limited() {
        let store = sample_store();
        let recommender = Recommender::new(&store);

        let mut query = RecommendationQuery::at(LOS_ANGELES);
        query.radius = 300.0;
        query.limit = 3;
        let ranked = recommender.recommend(&query).unwrap();

        assert_eq!(ranked.len(), 3);
        let scores: Vec<f64> = ranked
            .iter()
            .map(|c| c.recommendation_score.expect("scored"))
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        // The Nose ~23.5, Scream ~20.9, The Mandala ~-18.2
        assert_eq!(names(&ranked), vec!["The Nose", "Scream", "The Mandala"]);
    }

    #[test]
    fn grade_and_hold_preferences_narrow_results() {
        let store = sample_store();
        let recommender = Recommender::new(&store);

        let mut query = RecommendationQuery::at(LOS_ANGELES);
        query.radius = 300.0;
        query.grades = vec!["V2".into(), "V4".into(), "V5".into()];
        query.holds = vec!["crimps".into(), "jugs".into()];
        let ranked = recommender.recommend(&query).unwrap();
        assert_eq!(names(&ranked), vec!["Buttermilk Traverse"]);
    }

    #[test]
    fn zero_limit_returns_nothing() {
        let store = sample_store();
        let recommender = Recommender::new(&store);

        let mut query = RecommendationQuery::at(LOS_ANGELES);
        query.radius = 300.0;
        query.limit = 0;
        assert!(recommender.recommend(&query).unwrap().is_empty());
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let store = MemoryRouteStore::new();
        for name in ["First", "Second", "Third"] {
            store
                .insert(boulder(name, "V3", Some((34.0, -116.0)), 0.5, &[], Some(4.0)))
                .unwrap();
        }
        let recommender = Recommender::new(&store);

        let query = RecommendationQuery::at(Coordinates { lat: 34.1, lon: -116.0 });
        for _ in 0..3 {
            let ranked = recommender.recommend(&query).unwrap();
            assert_eq!(names(&ranked), vec!["First", "Second", "Third"]);
            let score = ranked[0].recommendation_score;
            assert!(ranked.iter().all(|c| c.recommendation_score == score));
        }
    }

    #[test]
    fn statistics_ignore_preferences() {
        let store = sample_store();
        let recommender = Recommender::new(&store);

        let stats = recommender.statistics(&LOS_ANGELES, 300.0).unwrap();
        assert_eq!(stats.total_routes, 5);
        let summary = stats.summary.expect("summary");
        assert_eq!(summary.grade_distribution.get("V12"), Some(&1));
        assert_eq!(summary.grade_distribution.get("V8"), Some(&1));
        // (4.2 + 4.8 + 3.9 + 4.1 + 4.9) / 5
        assert_eq!(summary.average_rating, 4.38);
        // (0.5 + 1.2 + 0.3 + 0.8 + 0.7) / 5
        assert_eq!(summary.average_approach, 0.7);
    }

    #[test]
    fn statistics_for_empty_area() {
        let store = sample_store();
        let recommender = Recommender::new(&store);
        let stats = recommender
            .statistics(&Coordinates { lat: -33.9, lon: 18.4 }, 100.0)
            .unwrap();
        assert_eq!(stats, AreaStatistics { total_routes: 0, summary: None });
    }
}
