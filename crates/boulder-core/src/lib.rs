pub mod error;
pub mod filter;
pub mod models;
pub mod recommend;
pub mod scoring;
pub mod spatial;
pub mod stats;
pub mod store;

pub use error::{CoreError, StoreError};
pub use filter::Preferences;
pub use models::{Candidate, Coordinates, NewRoute, Route};
pub use recommend::{RecommendationQuery, Recommender};
pub use scoring::ScoringWeights;
pub use spatial::haversine_miles;
pub use stats::{AreaStatistics, AreaSummary};
pub use store::{MemoryRouteStore, RouteStore};
