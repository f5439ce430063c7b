//! `GET /history?city=&limit=` — recent readings for one city.

use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{Config, Feed};

// ---

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    city: Option<String>,
    limit: Option<u32>,
}

pub fn router() -> Router<(Feed, Config)> {
    // ---
    Router::new().route("/history", get(handler))
}

async fn handler(
    Query(params): Query<HistoryQuery>,
    State((feed, config)): State<(Feed, Config)>,
) -> impl IntoResponse {
    // ---
    let Some(city) = params.city.filter(|c| !c.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "city parameter is required" })),
        )
            .into_response();
    };

    let limit = params.limit.unwrap_or(200).min(config.history_limit) as usize;

    match feed.history(&city, limit).await {
        Ok(payload) => {
            info!(
                "GET /history - city={} returning {} readings",
                city,
                payload.readings.len()
            );
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(e) => {
            error!("Failed to fetch history for {}: {:#}", city, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "upstream feed unavailable" })),
            )
                .into_response()
        }
    }
}
