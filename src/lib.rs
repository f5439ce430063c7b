//! Library surface of the AeroSense backend.
//!
//! The binary in `main.rs` and the integration tests both build the
//! application router through [`app`], so the HTTP surface under test is
//! exactly the one served in production.

use axum::Router;

pub mod alerts;
pub mod aqi;
pub mod config;
pub mod feed;
pub mod mock;
pub mod models;
pub mod recommend;
mod routes;

pub use config::Config;
pub use feed::Feed;
pub use models::{Alert, ForecastBundle, ForecastPoint, SensorReading};

// ---

/// Assemble the full API router with the given feed and configuration.
pub fn app(feed: Feed, config: Config) -> Router {
    // ---
    routes::router(feed, config)
}
