//! Route record store contract and an in-memory implementation.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use crate::error::StoreError;
use crate::models::{NewRoute, Route};

/// Read/insert capability the core depends on.
///
/// Implementations must be safe for concurrent readers; the core never writes
/// during a query.
pub trait RouteStore {
    /// Append a record, assigning its identity and creation time.
    fn insert(&self, route: NewRoute) -> Result<Route, StoreError>;

    /// Every record with known coordinates.
    fn located_routes(&self) -> Result<Vec<Route>, StoreError>;
}

/// Append-only route store held in memory.
///
/// Also serves as the hot cache in front of SQLite in the server.
pub struct MemoryRouteStore {
    routes: RwLock<Vec<Route>>,
    next_id: AtomicI64,
}

impl Default for MemoryRouteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRouteStore {
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Load a record that already has an identity (e.g. read back from disk).
    ///
    /// Keeps the id counter ahead of every restored id.
    pub fn restore(&self, route: Route) -> Result<(), StoreError> {
        self.next_id.fetch_max(route.id + 1, Ordering::SeqCst);
        let mut routes = self.routes.write().map_err(poisoned)?;
        routes.push(route);
        Ok(())
    }

    /// Look up a record by id, located or not.
    pub fn get(&self, id: i64) -> Result<Option<Route>, StoreError> {
        let routes = self.routes.read().map_err(poisoned)?;
        Ok(routes.iter().find(|r| r.id == id).cloned())
    }

    /// Every record, in insertion order.
    pub fn all_routes(&self) -> Result<Vec<Route>, StoreError> {
        let routes = self.routes.read().map_err(poisoned)?;
        Ok(routes.clone())
    }

    pub fn len(&self) -> usize {
        self.routes.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RouteStore for MemoryRouteStore {
    fn insert(&self, route: NewRoute) -> Result<Route, StoreError> {
        let errors = route.validate();
        if !errors.is_empty() {
            return Err(StoreError::InvalidRecord(errors.join("; ")));
        }

        let mut routes = self.routes.write().map_err(poisoned)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Route::from_new(id, route, Utc::now());
        routes.push(stored.clone());
        Ok(stored)
    }

    fn located_routes(&self) -> Result<Vec<Route>, StoreError> {
        let routes = self.routes.read().map_err(poisoned)?;
        Ok(routes
            .iter()
            .filter(|r| r.coordinates.is_some())
            .cloned()
            .collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Unavailable("route store lock poisoned".to_string())
}
