//! `GET /mapdata` — per-city map overlay rows plus district boundaries.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use tracing::{error, info};

use crate::{Config, Feed};

// ---

pub fn router() -> Router<(Feed, Config)> {
    // ---
    Router::new().route("/mapdata", get(handler))
}

async fn handler(State((feed, _config)): State<(Feed, Config)>) -> impl IntoResponse {
    // ---
    match feed.map_data().await {
        Ok(data) => {
            info!("GET /mapdata - {} cities", data.cities.len());
            (StatusCode::OK, Json(data)).into_response()
        }
        Err(e) => {
            error!("Failed to fetch map data: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "upstream feed unavailable" })),
            )
                .into_response()
        }
    }
}
