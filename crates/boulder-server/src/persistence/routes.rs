//! Route persistence operations.

use anyhow::Result;
use boulder_core::{Coordinates, NewRoute, Route};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

const ROUTE_COLUMNS: &str = "id, name, grade, location, latitude, longitude, approach_distance, \
     route_type, holds, description, url, rating, height, fa, created_at";

/// Insert a route, returning it with its assigned id and creation time.
pub async fn insert_route(pool: &SqlitePool, route: &NewRoute) -> Result<Route> {
    let holds_json = serde_json::to_string(&route.holds)?;
    let created_at = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO routes (name, grade, location, latitude, longitude, approach_distance,
                            route_type, holds, description, url, rating, height, fa, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#,
    )
    .bind(&route.name)
    .bind(&route.grade)
    .bind(&route.location)
    .bind(route.coordinates.map(|c| c.lat))
    .bind(route.coordinates.map(|c| c.lon))
    .bind(route.approach_distance)
    .bind(&route.route_type)
    .bind(&holds_json)
    .bind(&route.description)
    .bind(&route.url)
    .bind(route.rating)
    .bind(route.height)
    .bind(&route.first_ascent)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(Route::from_new(
        result.last_insert_rowid(),
        route.clone(),
        created_at,
    ))
}

/// Load every route, oldest first.
pub async fn load_all_routes(pool: &SqlitePool) -> Result<Vec<Route>> {
    let sql = format!("SELECT {} FROM routes ORDER BY id", ROUTE_COLUMNS);
    let rows = sqlx::query_as::<_, RouteRow>(&sql).fetch_all(pool).await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

/// Get a single route by id.
pub async fn get_route(pool: &SqlitePool, id: i64) -> Result<Option<Route>> {
    let sql = format!("SELECT {} FROM routes WHERE id = ?1", ROUTE_COLUMNS);
    let row = sqlx::query_as::<_, RouteRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(Route::try_from).transpose()
}

pub async fn count_routes(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM routes")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct RouteRow {
    id: i64,
    name: String,
    grade: String,
    location: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    approach_distance: f64,
    route_type: String,
    holds: String,
    description: String,
    url: String,
    rating: Option<f64>,
    height: Option<f64>,
    fa: Option<String>,
    created_at: String,
}

impl TryFrom<RouteRow> for Route {
    type Error = anyhow::Error;

    fn try_from(row: RouteRow) -> Result<Self> {
        let holds: Vec<String> = if row.holds.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&row.holds)?
        };

        let coordinates = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => Coordinates::from_raw(lat, lon),
            _ => None,
        };

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Route {
            id: row.id,
            name: row.name,
            grade: row.grade,
            location: row.location,
            coordinates,
            approach_distance: row.approach_distance,
            route_type: row.route_type,
            holds,
            description: row.description,
            url: row.url,
            rating: row.rating,
            height: row.height,
            first_ascent: row.fa,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::init_database;

    fn located(name: &str, lat: f64, lon: f64) -> NewRoute {
        let mut route = NewRoute::boulder(name, "V4");
        route.coordinates = Some(Coordinates { lat, lon });
        route.holds = vec!["crimps".into(), "slopers".into()];
        route.rating = Some(4.2);
        route.first_ascent = Some("Unknown".into());
        route
    }

    #[tokio::test]
    async fn insert_then_load_preserves_fields() {
        let db = init_database(":memory:", 1).await.unwrap();
        let inserted = insert_route(db.pool(), &located("The Nose", 34.0135, -116.1669))
            .await
            .unwrap();
        assert_eq!(inserted.id, 1);

        let loaded = get_route(db.pool(), inserted.id).await.unwrap().expect("route");
        assert_eq!(loaded.name, "The Nose");
        assert_eq!(loaded.coordinates, inserted.coordinates);
        assert_eq!(loaded.holds, vec!["crimps", "slopers"]);
        assert_eq!(loaded.rating, Some(4.2));
        assert_eq!(loaded.height, None);
        assert_eq!(loaded.first_ascent.as_deref(), Some("Unknown"));
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            inserted.created_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn unlocated_rows_load_without_coordinates() {
        let db = init_database(":memory:", 1).await.unwrap();
        insert_route(db.pool(), &located("Scream", 34.0142, -116.1672))
            .await
            .unwrap();
        insert_route(db.pool(), &NewRoute::boulder("Scraped", "V2"))
            .await
            .unwrap();

        assert_eq!(count_routes(db.pool()).await.unwrap(), 2);

        let all = load_all_routes(db.pool()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Scream");
        assert!(all[0].coordinates.is_some());
        assert_eq!(all[1].name, "Scraped");
        assert!(all[1].coordinates.is_none());
        assert!(all[1].holds.is_empty());
    }

    #[tokio::test]
    async fn missing_route_is_none() {
        let db = init_database(":memory:", 1).await.unwrap();
        assert!(get_route(db.pool(), 99).await.unwrap().is_none());
    }
}
