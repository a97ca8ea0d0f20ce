//! Great-circle distance helpers. All distances are in statute miles.

use crate::models::Coordinates;

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3_958.761_3;

/// Haversine distance between two points in miles.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance between two positions in miles.
pub fn distance_miles(from: &Coordinates, to: &Coordinates) -> f64 {
    haversine_miles(from.lat, from.lon, to.lat, to.lon)
}

/// Distance along the meridian alone.
///
/// A lower bound on the great-circle distance, up to a few ULPs of rounding.
pub fn meridional_miles(lat1: f64, lat2: f64) -> f64 {
    (lat2 - lat1).abs().to_radians() * EARTH_RADIUS_MILES
}

/// Whether `lat2` is certainly farther than `radius` miles from `lat1`.
///
/// The slack absorbs rounding where the meridional distance comes out a hair
/// above the haversine one, so a point exactly on the radius is never skipped.
pub fn beyond_latitude_band(lat1: f64, lat2: f64, radius: f64) -> bool {
    meridional_miles(lat1, lat2) > radius * (1.0 + 1e-12) + 1e-9
}
