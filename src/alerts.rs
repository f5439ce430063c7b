//! Threshold-based alert derivation.
//!
//! Alerts are a pure function of the latest readings: a reading crossing
//! any threshold contributes one alert row carrying every triggered
//! message. Readings below all thresholds are skipped entirely.

use chrono::{DateTime, Utc};

use crate::models::{Alert, SensorReading};

// ---

const AQI_THRESHOLD: i32 = 150;
const PM25_THRESHOLD: f64 = 90.0;
const PM10_THRESHOLD: f64 = 150.0;

/// Derive active alerts from a batch of latest readings.
pub fn derive(readings: &[SensorReading], now: DateTime<Utc>) -> Vec<Alert> {
    // ---
    let mut alerts = Vec::new();

    for reading in readings {
        let mut messages = Vec::new();

        if reading.aqi >= AQI_THRESHOLD {
            messages.push(format!(
                "AQI reached {} ({}) in {}.",
                reading.aqi, reading.category, reading.city
            ));
        }
        if reading.pm25 >= PM25_THRESHOLD {
            messages.push(format!(
                "High PM2.5 concentration ({:.1} µg/m³) detected.",
                reading.pm25
            ));
        }
        if reading.pm10 >= PM10_THRESHOLD {
            messages.push(format!("Elevated PM10 levels ({:.1} µg/m³).", reading.pm10));
        }

        if messages.is_empty() {
            continue;
        }

        alerts.push(Alert {
            city: reading.city.clone(),
            state: reading.state.clone(),
            category: reading.category.clone(),
            messages,
            aqi: reading.aqi,
            color: reading.color.clone(),
            timestamp: Some(now),
        });
    }

    alerts
}
