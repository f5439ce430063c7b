//! `GET /predict?city=` — 24-hour AQI forecast, normalized bundle shape.

use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{Config, Feed};

// ---

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    city: Option<String>,
}

pub fn router() -> Router<(Feed, Config)> {
    // ---
    Router::new().route("/predict", get(handler))
}

async fn handler(
    Query(params): Query<PredictQuery>,
    State((feed, _config)): State<(Feed, Config)>,
) -> impl IntoResponse {
    // ---
    match feed.forecast(params.city.as_deref()).await {
        Ok(bundle) => {
            info!(
                "GET /predict - model={} points={}",
                bundle.model_name,
                bundle.points.len()
            );
            (StatusCode::OK, Json(bundle)).into_response()
        }
        Err(e) => {
            error!("Failed to fetch forecast: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "upstream feed unavailable" })),
            )
                .into_response()
        }
    }
}
