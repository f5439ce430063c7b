//! `GET /recommendations?city=` — rule-based health advisories.
//!
//! Looks up the latest reading for the requested city and runs it through
//! the recommendation engine. A missing or unknown city is not an error:
//! the engine's no-data branch answers with its connect-sensors placeholder.

use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{recommend, Config, Feed};

// ---

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    city: Option<String>,
}

/// JSON response body for the `/recommendations` endpoint.
#[derive(Debug, Serialize)]
struct RecommendationsResponse {
    city: Option<String>,
    generated_at: DateTime<Utc>,
    tips: Vec<String>,
}

pub fn router() -> Router<(Feed, Config)> {
    // ---
    Router::new().route("/recommendations", get(handler))
}

async fn handler(
    Query(params): Query<RecommendationsQuery>,
    State((feed, _config)): State<(Feed, Config)>,
) -> impl IntoResponse {
    // ---
    let latest = match feed.latest().await {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to fetch latest readings: {:#}", e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "upstream feed unavailable" })),
            )
                .into_response();
        }
    };

    let reading = match params.city.as_deref() {
        Some(city) => latest
            .readings
            .iter()
            .find(|r| r.city.eq_ignore_ascii_case(city)),
        None => latest.readings.first(),
    };

    let tips = recommend::recommendations(reading);
    info!(
        "GET /recommendations - city={:?} tips={}",
        params.city,
        tips.len()
    );

    let body = RecommendationsResponse {
        city: reading.map(|r| r.city.clone()),
        generated_at: Utc::now(),
        tips,
    };
    (StatusCode::OK, Json(body)).into_response()
}
