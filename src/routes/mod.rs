use axum::Router;

use crate::{Config, Feed};

mod health;
mod history;
mod latest;
mod mapdata;
mod predict;
mod recommendations;

// ---

pub fn router(feed: Feed, config: Config) -> Router {
    // ---
    Router::new()
        .merge(latest::router())
        .merge(history::router())
        .merge(predict::router())
        .merge(mapdata::router())
        .merge(recommendations::router())
        .merge(health::router())
        .with_state((feed, config))
}
