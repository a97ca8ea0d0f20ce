//! Bundled sample routes for a fresh install.

use anyhow::Result;
use boulder_core::{Coordinates, NewRoute};
use tracing::info;

use crate::state::AppState;

/// Seeding is skipped once this many routes exist around the reference point.
const SEED_THRESHOLD: usize = 5;
const SEED_CHECK_CENTER: Coordinates = Coordinates {
    lat: 37.0,
    lon: -119.0,
};
const SEED_CHECK_RADIUS: f64 = 500.0;

struct Sample {
    name: &'static str,
    grade: &'static str,
    location: &'static str,
    lat: f64,
    lon: f64,
    approach: f64,
    holds: [&'static str; 2],
    description: &'static str,
    url: &'static str,
    rating: f64,
    height: f64,
    fa: &'static str,
}

const SAMPLES: [Sample; 6] = [
    Sample {
        name: "The Nose",
        grade: "V4",
        location: "Joshua Tree National Park, CA",
        lat: 34.0135,
        lon: -116.1669,
        approach: 0.5,
        holds: ["crimps", "slopers"],
        description: "Classic overhang with technical crimping sequence. Great introduction to Joshua Tree granite.",
        url: "https://www.mountainproject.com/route/105720495/the-nose",
        rating: 4.2,
        height: 12.0,
        fa: "Unknown",
    },
    Sample {
        name: "Midnight Lightning",
        grade: "V8",
        location: "Yosemite Valley, CA",
        lat: 37.7749,
        lon: -119.4194,
        approach: 1.2,
        holds: ["slopers", "mantles"],
        description: "Iconic sloper problem on Half Dome boulder. A true test piece of Yosemite.",
        url: "https://www.mountainproject.com/route/105833381/midnight-lightning",
        rating: 4.8,
        height: 15.0,
        fa: "Ron Kauk, 1978",
    },
    Sample {
        name: "Buttermilk Traverse",
        grade: "V2",
        location: "Bishop, CA",
        lat: 37.3719,
        lon: -118.4064,
        approach: 0.3,
        holds: ["jugs", "crimps"],
        description: "Long traverse with great holds and movement. Perfect for beginners.",
        url: "https://www.mountainproject.com/route/106028067/buttermilk-traverse",
        rating: 3.9,
        height: 8.0,
        fa: "Unknown",
    },
    Sample {
        name: "Scream",
        grade: "V5",
        location: "Joshua Tree National Park, CA",
        lat: 34.0142,
        lon: -116.1672,
        approach: 0.8,
        holds: ["crimps", "pinches"],
        description: "Powerful moves on small holds. Technical and sustained.",
        url: "https://www.mountainproject.com/route/105720498/scream",
        rating: 4.1,
        height: 14.0,
        fa: "Unknown",
    },
    Sample {
        name: "Hobbit Hole",
        grade: "V3",
        location: "Tahoe, CA",
        lat: 39.0968,
        lon: -120.0324,
        approach: 1.5,
        holds: ["jugs", "slopers"],
        description: "Fun problem with a tricky topout. Great views of Lake Tahoe.",
        url: "https://www.mountainproject.com/route/105833382/hobbit-hole",
        rating: 4.0,
        height: 10.0,
        fa: "Unknown",
    },
    Sample {
        name: "The Mandala",
        grade: "V12",
        location: "Bishop, CA",
        lat: 37.3722,
        lon: -118.4061,
        approach: 0.7,
        holds: ["crimps", "slopers"],
        description: "World-class testpiece. Incredibly technical and powerful.",
        url: "https://www.mountainproject.com/route/105833383/the-mandala",
        rating: 4.9,
        height: 16.0,
        fa: "Chris Sharma, 2000",
    },
];

/// The bundled sample routes as insert payloads.
pub fn sample_routes() -> Vec<NewRoute> {
    SAMPLES
        .iter()
        .map(|s| {
            let mut route = NewRoute::boulder(s.name, s.grade);
            route.location = s.location.to_string();
            route.coordinates = Some(Coordinates { lat: s.lat, lon: s.lon });
            route.approach_distance = s.approach;
            route.holds = s.holds.iter().map(|h| h.to_string()).collect();
            route.description = s.description.to_string();
            route.url = s.url.to_string();
            route.rating = Some(s.rating);
            route.height = Some(s.height);
            route.first_ascent = Some(s.fa.to_string());
            route
        })
        .collect()
}

/// Insert the samples unless the reference area already has enough routes.
/// Returns the number of routes inserted.
pub async fn seed_sample_data(state: &AppState) -> Result<usize> {
    let existing = state
        .recommender()
        .near(&SEED_CHECK_CENTER, SEED_CHECK_RADIUS)?
        .len();
    if existing >= SEED_THRESHOLD {
        info!("Skipping sample data: {} routes already near reference point", existing);
        return Ok(0);
    }

    let mut inserted = 0;
    for route in sample_routes() {
        state.add_route(route).await?;
        inserted += 1;
    }
    info!("Seeded {} sample routes", inserted);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn samples_are_valid_and_located() {
        let routes = sample_routes();
        assert_eq!(routes.len(), 6);
        assert!(routes.iter().all(|r| r.is_valid() && r.coordinates.is_some()));
    }

    #[tokio::test]
    async fn seeding_runs_once() {
        let state = AppState::new(Config::from_env());
        assert_eq!(seed_sample_data(&state).await.unwrap(), 6);
        assert_eq!(seed_sample_data(&state).await.unwrap(), 0);
        assert_eq!(state.route_count(), 6);
    }
}
