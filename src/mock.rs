//! Mock telemetry synthesizer.
//!
//! Drop-in substitute for a real AeroSense upstream: every operation
//! returns a fully formed payload for the fixed five-city roster and never
//! fails. Unknown city names silently fall back to the first roster entry.
//! The per-city base AQI is a toy deterministic seed (first character code
//! plus name length, reduced into [45, 85]) so repeated calls agree on the
//! band while secondary fields carry independent jitter. The only ambient
//! inputs are the wall clock and a thread-local random source.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::Rng;

use crate::aqi;
use crate::models::{
    ForecastBundle, ForecastPoint, LatestPayload, MapCity, MapData, ModelMetrics, SensorReading,
};

// ---

/// Roster entry for a monitored city.
#[derive(Debug, Clone, Copy)]
pub struct City {
    // ---
    pub city: &'static str,
    pub state: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Monitored cities across Telangana and Andhra Pradesh.
pub const CITIES: [City; 5] = [
    City {
        city: "Hyderabad",
        state: "Telangana",
        latitude: 17.3850,
        longitude: 78.4867,
    },
    City {
        city: "Warangal",
        state: "Telangana",
        latitude: 17.9689,
        longitude: 79.5941,
    },
    City {
        city: "Vijayawada",
        state: "Andhra Pradesh",
        latitude: 16.5062,
        longitude: 80.6480,
    },
    City {
        city: "Visakhapatnam",
        state: "Andhra Pradesh",
        latitude: 17.6868,
        longitude: 83.2185,
    },
    City {
        city: "Guntur",
        state: "Andhra Pradesh",
        latitude: 16.3067,
        longitude: 80.4365,
    },
];

/// Longest history window synthesized, regardless of requested length.
const MAX_WINDOW_HOURS: i64 = 48;

/// Forecast horizon in hours.
const FORECAST_HOURS: i64 = 24;

// ---

fn find_city(name: &str) -> City {
    // ---
    CITIES
        .iter()
        .copied()
        .find(|c| c.city.eq_ignore_ascii_case(name))
        .unwrap_or(CITIES[0])
}

/// Deterministic base AQI for a city name, always inside [45, 85].
///
/// Intentionally a toy seed, not a hash: first character code plus name
/// length keeps repeated calls in the same band.
pub fn base_aqi(city: &str) -> i32 {
    // ---
    let seed = city.chars().next().map_or(0, |c| c as u32) + city.len() as u32;
    45 + (seed % 40) as i32
}

/// Diurnal modulation factor, peaking six hours after midnight-relative dawn.
fn diurnal_factor(hour_of_day: u32) -> f64 {
    // ---
    1.0 + 0.3 * ((f64::from(hour_of_day) - 6.0) * PI / 12.0).sin()
}

fn round1(value: f64) -> f64 {
    // ---
    (value * 10.0).round() / 10.0
}

fn fresh_reading(city: City, timestamp: DateTime<Utc>) -> SensorReading {
    // ---
    let mut rng = rand::thread_rng();

    let aqi = base_aqi(city.city);
    let category = aqi::category(f64::from(aqi));
    let pm25 = round1(f64::from(aqi) / 2.0);

    SensorReading {
        id: format!("mock-{}", city.city.to_lowercase()),
        city: city.city.to_string(),
        state: city.state.to_string(),
        latitude: city.latitude,
        longitude: city.longitude,
        pm25,
        pm10: pm25 * 2.0,
        co2: 450.0 + rng.gen_range(0.0..100.0),
        no2: 25.0 + rng.gen_range(0.0..15.0),
        temperature: round1(28.0 + rng.gen_range(0.0..6.0)),
        humidity: (45.0_f64 + rng.gen_range(0.0..25.0)).round(),
        aqi,
        category: category.to_string(),
        color: aqi::color_for(category).to_string(),
        health: aqi::health_for(category).to_string(),
        timestamp,
        primary_pollutant: Some("pm25".to_string()),
    }
}

// ---

/// Synthesize the `/latest` payload: one reading per roster city.
pub fn latest() -> LatestPayload {
    // ---
    let now = Utc::now();
    LatestPayload {
        updated_at: Some(now),
        readings: CITIES.iter().map(|&c| fresh_reading(c, now)).collect(),
        alerts: Vec::new(),
        palette: aqi::palette(),
    }
}

/// Synthesize `limit` historical readings for a city, oldest first.
///
/// Readings are evenly spaced over a window of `min(limit, 48)` hours
/// ending now. AQI follows the diurnal curve around the city's base value
/// with bounded noise, clamped into [0, 500].
pub fn history(city_name: &str, limit: usize) -> Vec<SensorReading> {
    // ---
    let city = find_city(city_name);
    if limit == 0 {
        return Vec::new();
    }

    let now = Utc::now();
    let window_hours = (limit as i64).min(MAX_WINDOW_HOURS);
    let step_secs = window_hours * 3600 / limit as i64;
    let base = f64::from(base_aqi(city.city));

    let mut rng = rand::thread_rng();
    let mut readings = Vec::with_capacity(limit);

    // Iterate from the oldest offset down to zero so the output is already
    // in chronological order.
    for i in (0..limit).rev() {
        let timestamp = now - Duration::seconds(step_secs * i as i64);
        let noise = rng.gen_range(-5.0..5.0);
        let aqi_value = (base * diurnal_factor(timestamp.hour()) + noise).clamp(0.0, 500.0);

        let mut reading = fresh_reading(city, timestamp);
        reading.id = format!("mock-{}-{}", city.city.to_lowercase(), i);
        reading.aqi = aqi_value.round() as i32;
        reading.pm25 = round1((aqi_value / 2.0 + noise / 2.0).max(0.0));
        reading.pm10 = reading.pm25 * 2.0;
        reading.rederive();
        readings.push(reading);
    }

    readings
}

/// Synthesize a 24-hour forecast bundle for a city (roster default when
/// absent or unknown).
pub fn forecast(city_name: Option<&str>) -> ForecastBundle {
    // ---
    let city = city_name.map_or(CITIES[0], find_city);
    let base = f64::from(base_aqi(city.city));
    let now = Utc::now();

    let mut rng = rand::thread_rng();
    let mut points = Vec::with_capacity(FORECAST_HOURS as usize);

    for hour in 1..=FORECAST_HOURS {
        let target_time = now + Duration::hours(hour);
        let predicted = base * diurnal_factor(target_time.hour()) + rng.gen_range(-2.5..2.5);

        points.push(ForecastPoint {
            target_time,
            predicted_aqi: predicted.clamp(0.0, 500.0).round() as i32,
            confidence: Some(0.75 + rng.gen_range(0.0..0.2)),
        });
    }

    ForecastBundle {
        generated_at: now,
        model_name: "Mock Forecast Model".to_string(),
        points,
        metrics: Some(ModelMetrics {
            r2: Some(0.85),
            mae: Some(8.5),
            rmse: Some(12.3),
            training_records: 1000,
        }),
    }
}

/// Synthesize the map overlay: per-city summary rows plus the boundary
/// FeatureCollection supplied by the caller.
pub fn map_data(geojson: serde_json::Value) -> MapData {
    // ---
    let now = Utc::now();
    let cities = CITIES
        .iter()
        .map(|&c| {
            let reading = fresh_reading(c, now);
            MapCity {
                city: reading.city,
                state: reading.state,
                location: [reading.latitude, reading.longitude],
                aqi: reading.aqi,
                category: reading.category,
                color: reading.color,
                health: reading.health,
            }
        })
        .collect();

    MapData {
        updated_at: now,
        cities,
        geojson,
    }
}

/// Empty FeatureCollection used when no boundary file is configured.
pub fn empty_geojson() -> serde_json::Value {
    // ---
    serde_json::json!({ "type": "FeatureCollection", "features": [] })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_base_aqi_deterministic_and_bounded() {
        // ---
        for city in CITIES {
            let first = base_aqi(city.city);
            let second = base_aqi(city.city);
            assert_eq!(first, second, "base aqi drifted for {}", city.city);
            assert!((45..=85).contains(&first), "{} out of band: {first}", city.city);
        }
    }

    #[test]
    fn test_latest_covers_roster() {
        // ---
        let payload = latest();
        assert_eq!(payload.readings.len(), CITIES.len());
        assert!(payload.alerts.is_empty());
        assert_eq!(payload.palette.len(), 6);
        assert!(payload.updated_at.is_some());

        for reading in &payload.readings {
            assert_eq!(reading.category, aqi::category(f64::from(reading.aqi)));
            assert_eq!(reading.id, format!("mock-{}", reading.city.to_lowercase()));
            assert!((28.0..34.1).contains(&reading.temperature));
            assert!((45.0..=70.0).contains(&reading.humidity));
            assert!((reading.pm10 - reading.pm25 * 2.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_history_exact_length_and_clamped() {
        // ---
        let readings = history("Warangal", 100);
        assert_eq!(readings.len(), 100);
        for reading in &readings {
            assert!((0..=500).contains(&reading.aqi));
            assert!(reading.pm25 >= 0.0);
            assert_eq!(reading.category, aqi::category(f64::from(reading.aqi)));
        }
    }

    #[test]
    fn test_history_chronological_and_windowed() {
        // ---
        let readings = history("Hyderabad", 200);
        for pair in readings.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }

        // 200 samples still fit inside the 48-hour cap.
        let span = readings.last().unwrap().timestamp - readings.first().unwrap().timestamp;
        assert!(span <= Duration::hours(MAX_WINDOW_HOURS));
    }

    #[test]
    fn test_history_unknown_city_falls_back() {
        // ---
        let readings = history("Atlantis", 10);
        assert_eq!(readings.len(), 10);
        assert!(readings.iter().all(|r| r.city == CITIES[0].city));
    }

    #[test]
    fn test_history_zero_limit() {
        // ---
        assert!(history("Guntur", 0).is_empty());
    }

    #[test]
    fn test_forecast_shape() {
        // ---
        let bundle = forecast(Some("Vijayawada"));
        assert_eq!(bundle.points.len(), 24);
        assert_eq!(bundle.model_name, "Mock Forecast Model");

        for pair in bundle.points.windows(2) {
            assert_eq!(pair[1].target_time - pair[0].target_time, Duration::hours(1));
        }
        for point in &bundle.points {
            assert!((0..=500).contains(&point.predicted_aqi));
            let confidence = point.confidence.expect("mock confidence always set");
            assert!((0.75..=0.95).contains(&confidence));
        }

        let metrics = bundle.metrics.expect("mock metrics always set");
        assert_eq!(metrics.training_records, 1000);
    }

    #[test]
    fn test_forecast_defaults_to_roster_head() {
        // ---
        let explicit = forecast(Some(CITIES[0].city));
        let defaulted = forecast(None);
        let unknown = forecast(Some("Nowhere"));

        // All three share the same base, so the deterministic parts agree.
        assert_eq!(explicit.points.len(), defaulted.points.len());
        assert_eq!(defaulted.points.len(), unknown.points.len());
    }

    #[test]
    fn test_map_data_rows() {
        // ---
        let data = map_data(empty_geojson());
        assert_eq!(data.cities.len(), CITIES.len());
        assert_eq!(data.geojson["type"], "FeatureCollection");

        for row in &data.cities {
            assert_eq!(row.category, aqi::category(f64::from(row.aqi)));
            assert_eq!(row.color, aqi::color_for(&row.category));
        }
    }
}
