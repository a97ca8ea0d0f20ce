//! Route cache in front of SQLite.

use anyhow::Result;
use boulder_core::{
    MemoryRouteStore, NewRoute, Recommender, Route, RouteStore, StoreError,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::persistence::{self, Database};

/// Application state - route cache plus the durable store behind it.
///
/// Reads are served from the in-memory cache; inserts write through to SQLite
/// first so the cache never holds a record the database does not.
pub struct AppState {
    routes: MemoryRouteStore,
    database: Option<Database>,
    config: Config,
}

impl AppState {
    /// State without persistence; routes live only as long as the process.
    pub fn new(config: Config) -> Self {
        Self {
            routes: MemoryRouteStore::new(),
            database: None,
            config,
        }
    }

    pub fn with_database(database: Database, config: Config) -> Self {
        Self {
            routes: MemoryRouteStore::new(),
            database: Some(database),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> Option<&Database> {
        self.database.as_ref()
    }

    /// Fill the cache from SQLite. Returns the number of routes loaded.
    pub async fn load_from_database(&self) -> Result<usize> {
        let Some(db) = &self.database else {
            return Ok(0);
        };

        let routes = persistence::routes::load_all_routes(db.pool()).await?;
        let count = routes.len();
        for route in routes {
            self.routes.restore(route)?;
        }
        info!("Loaded {} routes from database", count);
        Ok(count)
    }

    /// Append a route, persisting it before it becomes visible to queries.
    pub async fn add_route(&self, route: NewRoute) -> Result<Route> {
        let Some(db) = &self.database else {
            return Ok(self.routes.insert(route)?);
        };

        let errors = route.validate();
        if !errors.is_empty() {
            return Err(StoreError::InvalidRecord(errors.join("; ")).into());
        }

        let stored = persistence::routes::insert_route(db.pool(), &route).await?;
        self.routes.restore(stored.clone())?;
        debug!("Stored route {} '{}'", stored.id, stored.name);
        Ok(stored)
    }

    /// Look up a route by id, located or not.
    pub async fn get_route(&self, id: i64) -> Result<Option<Route>> {
        match &self.database {
            Some(db) => persistence::routes::get_route(db.pool(), id).await,
            None => Ok(self.routes.get(id)?),
        }
    }

    /// Number of routes currently cached.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Query engine over the cache with the configured scoring weights.
    pub fn recommender(&self) -> Recommender<'_, MemoryRouteStore> {
        Recommender::with_weights(&self.routes, self.config.weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boulder_core::Coordinates;

    fn test_config() -> Config {
        let mut config = Config::from_env();
        config.database_path = std::env::temp_dir()
            .join(format!("boulder-state-{}.db", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string();
        config
    }

    fn located(name: &str, lat: f64, lon: f64) -> NewRoute {
        let mut route = NewRoute::boulder(name, "V3");
        route.coordinates = Some(Coordinates { lat, lon });
        route
    }

    #[tokio::test]
    async fn routes_survive_restart() {
        let config = test_config();
        let db = persistence::init_database(&config.database_path, 1).await.unwrap();
        let state = AppState::with_database(db.clone(), config.clone());
        let stored = state.add_route(located("Hobbit Hole", 39.0968, -120.0324)).await.unwrap();
        state.add_route(NewRoute::boulder("Scraped", "V1")).await.unwrap();
        db.close().await;

        let db = persistence::init_database(&config.database_path, 1).await.unwrap();
        let restarted = AppState::with_database(db, config.clone());
        assert_eq!(restarted.load_from_database().await.unwrap(), 2);
        assert_eq!(restarted.route_count(), 2);
        let located = restarted
            .recommender()
            .near(&Coordinates { lat: 39.0, lon: -120.0 }, 50.0)
            .unwrap();
        assert_eq!(located.len(), 1);

        let loaded = restarted.get_route(stored.id).await.unwrap().expect("route");
        assert_eq!(loaded.name, "Hobbit Hole");

        let next = restarted.add_route(NewRoute::boulder("Next", "V0")).await.unwrap();
        assert!(next.id > stored.id);

        let _ = std::fs::remove_file(&config.database_path);
    }

    #[tokio::test]
    async fn invalid_routes_are_not_persisted() {
        let config = test_config();
        let db = persistence::init_database(&config.database_path, 1).await.unwrap();
        let state = AppState::with_database(db.clone(), config.clone());

        assert!(state.add_route(NewRoute::boulder("", "V1")).await.is_err());
        assert_eq!(persistence::routes::count_routes(db.pool()).await.unwrap(), 0);
        assert_eq!(state.route_count(), 0);

        let _ = std::fs::remove_file(&config.database_path);
    }

    #[tokio::test]
    async fn memory_only_state_serves_queries() {
        let state = AppState::new(test_config());
        state.add_route(located("Scream", 34.0142, -116.1672)).await.unwrap();

        let nearby = state
            .recommender()
            .near(&Coordinates { lat: 34.0, lon: -116.2 }, 10.0)
            .unwrap();
        assert_eq!(nearby.len(), 1);
        assert!(state.get_route(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn ids_stay_unique_across_cache_and_database() {
        let config = test_config();
        let db = persistence::init_database(&config.database_path, 1).await.unwrap();
        let state = AppState::with_database(db.clone(), config.clone());

        let first = state.add_route(located("Scream", 34.0142, -116.1672)).await.unwrap();
        let second = state.add_route(NewRoute::boulder("Scraped", "V2")).await.unwrap();
        db.close().await;

        let db = persistence::init_database(&config.database_path, 1).await.unwrap();
        let restarted = AppState::with_database(db.clone(), config.clone());
        restarted.load_from_database().await.unwrap();
        let third = restarted.add_route(located("The Nose", 34.0135, -116.1669)).await.unwrap();

        let mut ids = vec![first.id, second.id, third.id];
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert_eq!(restarted.route_count(), 3);

        let stored = persistence::routes::load_all_routes(db.pool()).await.unwrap();
        let stored_ids: Vec<i64> = stored.iter().map(|r| r.id).collect();
        assert_eq!(stored_ids, vec![first.id, second.id, third.id]);
        for id in stored_ids {
            let loaded = restarted.get_route(id).await.unwrap().expect("route");
            assert_eq!(loaded.id, id);
        }

        let _ = std::fs::remove_file(&config.database_path);
    }
}
