//! `GET /latest` — most recent reading per city, alerts, and the palette.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use tracing::{error, info};

use crate::{Config, Feed};

// ---

pub fn router() -> Router<(Feed, Config)> {
    // ---
    Router::new().route("/latest", get(handler))
}

async fn handler(State((feed, _config)): State<(Feed, Config)>) -> impl IntoResponse {
    // ---
    match feed.latest().await {
        Ok(payload) => {
            info!(
                "GET /latest - {} readings, {} alerts",
                payload.readings.len(),
                payload.alerts.len()
            );
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(e) => {
            error!("Failed to fetch latest readings: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "upstream feed unavailable" })),
            )
                .into_response()
        }
    }
}
