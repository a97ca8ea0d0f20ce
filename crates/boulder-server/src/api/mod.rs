//! API routes for the boulder server.

pub mod error;
pub mod recommend;
mod routes;

use crate::config::Config;
use axum::Router;

pub use error::ApiError;

pub fn routes(config: &Config) -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router(config)
}
