//! Data models for the AeroSense API payloads.
//!
//! Everything here is a read-only view model: constructed once (by the mock
//! synthesizer or the upstream feed normalizer) and serialized out, never
//! mutated afterwards. The `category`, `color`, and `health` fields of a
//! reading are always derived from `aqi` through the `aqi` module tables,
//! never set independently.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aqi;

// ---

/// One air-quality snapshot for a single city at a single instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    // ---
    pub id: String,
    pub city: String,
    pub state: String,
    pub latitude: f64,
    pub longitude: f64,
    pub pm25: f64,
    pub pm10: f64,
    pub co2: f64,
    pub no2: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub aqi: i32,
    pub category: String,
    pub color: String,
    pub health: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub primary_pollutant: Option<String>,
}

impl SensorReading {
    /// Re-derive `category`/`color`/`health` from the current `aqi` value.
    ///
    /// Applied at the feed boundary so readings received from an upstream
    /// service cannot carry labels inconsistent with their index.
    pub fn rederive(&mut self) {
        // ---
        let category = aqi::category(f64::from(self.aqi));
        self.color = aqi::color_for(category).to_string();
        self.health = aqi::health_for(category).to_string();
        self.category = category.to_string();
    }
}

/// A single hour of the 24-hour forecast horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    // ---
    pub target_time: DateTime<Utc>,
    pub predicted_aqi: i32,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Accuracy metrics reported alongside a forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetrics {
    // ---
    #[serde(default)]
    pub r2: Option<f64>,
    #[serde(default)]
    pub mae: Option<f64>,
    #[serde(default)]
    pub rmse: Option<f64>,
    #[serde(default)]
    pub training_records: u64,
}

/// Normalized forecast response served by `/predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastBundle {
    // ---
    pub generated_at: DateTime<Utc>,
    pub model_name: String,
    pub points: Vec<ForecastPoint>,
    pub metrics: Option<ModelMetrics>,
}

/// Active air-quality alert derived from the latest readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    // ---
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub category: String,
    #[serde(default)]
    pub messages: Vec<String>,
    pub aqi: i32,
    pub color: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response body for `GET /latest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestPayload {
    // ---
    pub updated_at: Option<DateTime<Utc>>,
    pub readings: Vec<SensorReading>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
    #[serde(default)]
    pub palette: HashMap<String, String>,
}

/// Response body for `GET /history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPayload {
    // ---
    pub city: String,
    pub readings: Vec<SensorReading>,
}

/// Per-city summary row on the map overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapCity {
    // ---
    pub city: String,
    pub state: String,
    /// `[latitude, longitude]`, matching the map widget's marker format.
    pub location: [f64; 2],
    pub aqi: i32,
    pub category: String,
    pub color: String,
    pub health: String,
}

/// Response body for `GET /mapdata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapData {
    // ---
    pub updated_at: DateTime<Utc>,
    pub cities: Vec<MapCity>,
    /// District boundary FeatureCollection, passed through verbatim.
    pub geojson: serde_json::Value,
}
