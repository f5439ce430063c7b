//! Data feed selection and upstream normalization.
//!
//! The service runs against one of two feeds, chosen at startup: the
//! built-in mock synthesizer, or an upstream AeroSense-compatible API
//! reached over HTTP. Every upstream payload passes through a normalizer
//! before it is served: pollutant concentrations re-derive the AQI and its
//! dependent labels, missing alert/palette sections are backfilled, and
//! the two forecast wire shapes (flat `points` vs. per-model
//! `predictions`) collapse into the single `ForecastBundle` schema.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{
    ForecastBundle, ForecastPoint, HistoryPayload, LatestPayload, MapData, ModelMetrics,
    SensorReading,
};
use crate::{alerts, aqi, mock, Config};

// ---

/// Where the four endpoints get their data.
#[derive(Clone)]
pub enum Feed {
    // ---
    /// Built-in synthesizer; carries the boundary GeoJSON loaded at startup.
    Mock { geojson: Arc<serde_json::Value> },
    /// External AeroSense-compatible API.
    Upstream {
        client: reqwest::Client,
        base_url: String,
    },
}

impl Feed {
    /// Build the feed described by the configuration.
    pub fn from_config(config: &Config) -> Feed {
        // ---
        match config.feed_url.as_deref() {
            Some(url) if !url.is_empty() => {
                tracing::info!("Using upstream feed at {}", url);
                Feed::Upstream {
                    client: reqwest::Client::new(),
                    base_url: url.trim_end_matches('/').to_string(),
                }
            }
            _ => {
                tracing::info!("No upstream feed configured, using mock telemetry");
                Feed::Mock {
                    geojson: Arc::new(load_geojson(config.geojson_path.as_deref())),
                }
            }
        }
    }

    /// Latest reading per city, with alerts and palette.
    pub async fn latest(&self) -> Result<LatestPayload> {
        // ---
        match self {
            Feed::Mock { .. } => Ok(mock::latest()),
            Feed::Upstream { client, base_url } => {
                let url = format!("{base_url}/latest");
                let mut payload: LatestPayload = client
                    .get(&url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .with_context(|| format!("GET {url}"))?
                    .json()
                    .await
                    .with_context(|| format!("decoding {url}"))?;

                for reading in &mut payload.readings {
                    normalize_reading(reading);
                }
                if payload.alerts.is_empty() {
                    payload.alerts = alerts::derive(&payload.readings, Utc::now());
                }
                if payload.palette.is_empty() {
                    payload.palette = aqi::palette();
                }
                Ok(payload)
            }
        }
    }

    /// Historical readings for one city, oldest first.
    pub async fn history(&self, city: &str, limit: usize) -> Result<HistoryPayload> {
        // ---
        match self {
            Feed::Mock { .. } => Ok(HistoryPayload {
                city: city.to_string(),
                readings: mock::history(city, limit),
            }),
            Feed::Upstream { client, base_url } => {
                let url = format!("{base_url}/history?city={city}&limit={limit}");
                let mut payload: HistoryPayload = client
                    .get(&url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .with_context(|| format!("GET {url}"))?
                    .json()
                    .await
                    .with_context(|| format!("decoding {url}"))?;

                for reading in &mut payload.readings {
                    normalize_reading(reading);
                }
                Ok(payload)
            }
        }
    }

    /// 24-hour forecast, normalized to the flat bundle shape.
    pub async fn forecast(&self, city: Option<&str>) -> Result<ForecastBundle> {
        // ---
        match self {
            Feed::Mock { .. } => Ok(mock::forecast(city)),
            Feed::Upstream { client, base_url } => {
                let url = match city {
                    Some(city) => format!("{base_url}/predict?city={city}"),
                    None => format!("{base_url}/predict"),
                };
                let wire: WireForecast = client
                    .get(&url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .with_context(|| format!("GET {url}"))?
                    .json()
                    .await
                    .with_context(|| format!("decoding {url}"))?;

                Ok(normalize_forecast(wire))
            }
        }
    }

    /// Map overlay: per-city summary rows plus district boundaries.
    pub async fn map_data(&self) -> Result<MapData> {
        // ---
        match self {
            Feed::Mock { geojson } => Ok(mock::map_data(geojson.as_ref().clone())),
            Feed::Upstream { client, base_url } => {
                let url = format!("{base_url}/mapdata");
                client
                    .get(&url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .with_context(|| format!("GET {url}"))?
                    .json()
                    .await
                    .with_context(|| format!("decoding {url}"))
            }
        }
    }
}

// ---

/// Re-derive the AQI-dependent fields of an upstream reading.
///
/// When the reading carries raw pollutant concentrations the whole index is
/// rebuilt from them; otherwise only the labels are realigned with the
/// reported `aqi`.
fn normalize_reading(reading: &mut SensorReading) {
    // ---
    let pollutant = |v: f64| (v > 0.0).then_some(v);
    let summary = aqi::compute_aqi(
        pollutant(reading.pm25),
        pollutant(reading.pm10),
        pollutant(reading.co2),
        pollutant(reading.no2),
    );

    if summary.primary_pollutant.is_some() {
        reading.aqi = summary.aqi;
        reading.category = summary.category.to_string();
        reading.color = summary.color.to_string();
        reading.health = summary.health.to_string();
        reading.primary_pollutant = summary.primary_pollutant.map(str::to_string);
    } else {
        reading.rederive();
    }
}

/// The two forecast response shapes seen in the wild.
///
/// Older deployments return a flat `points` array with one set of metrics;
/// newer ones return `predictions` keyed by model name with per-model
/// metrics and ensemble weights. Neither carries a version tag, so shape
/// is detected structurally.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireForecast {
    // ---
    Flat {
        generated_at: Option<DateTime<Utc>>,
        model_name: Option<String>,
        points: Vec<ForecastPoint>,
        #[serde(default)]
        metrics: Option<ModelMetrics>,
    },
    MultiModel {
        generated_at: Option<DateTime<Utc>>,
        predictions: HashMap<String, Vec<ForecastPoint>>,
        #[serde(default)]
        metrics: HashMap<String, ModelMetrics>,
        #[serde(default)]
        ensemble_weights: Option<HashMap<String, f64>>,
    },
}

/// Collapse either wire shape into a single `ForecastBundle`.
///
/// Multi-model responses prefer the `ensemble` series; without one, the
/// model with the best reported r2 wins.
fn normalize_forecast(wire: WireForecast) -> ForecastBundle {
    // ---
    match wire {
        WireForecast::Flat {
            generated_at,
            model_name,
            points,
            metrics,
        } => ForecastBundle {
            generated_at: generated_at.unwrap_or_else(Utc::now),
            model_name: model_name.unwrap_or_else(|| "upstream".to_string()),
            points,
            metrics,
        },
        WireForecast::MultiModel {
            generated_at,
            mut predictions,
            metrics,
            ensemble_weights,
        } => {
            if let Some(weights) = &ensemble_weights {
                tracing::debug!("Upstream ensemble weights: {:?}", weights);
            }

            let chosen = if predictions.contains_key("ensemble") {
                "ensemble".to_string()
            } else {
                let best = metrics
                    .iter()
                    .filter(|(name, _)| predictions.contains_key(name.as_str()))
                    .max_by(|a, b| {
                        a.1.r2
                            .unwrap_or(f64::NEG_INFINITY)
                            .total_cmp(&b.1.r2.unwrap_or(f64::NEG_INFINITY))
                    })
                    .map(|(name, _)| name.clone());
                best.or_else(|| predictions.keys().min().cloned())
                    .unwrap_or_default()
            };

            ForecastBundle {
                generated_at: generated_at.unwrap_or_else(Utc::now),
                points: predictions.remove(&chosen).unwrap_or_default(),
                metrics: metrics.get(&chosen).cloned(),
                model_name: chosen,
            }
        }
    }
}

/// Load the district boundary FeatureCollection, if configured.
fn load_geojson(path: Option<&str>) -> serde_json::Value {
    // ---
    let Some(path) = path else {
        return mock::empty_geojson();
    };

    match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring malformed GeoJSON at {}: {}", path, e);
                mock::empty_geojson()
            }
        },
        Err(e) => {
            tracing::warn!("Cannot read GeoJSON at {}: {}", path, e);
            mock::empty_geojson()
        }
    }
}
