//! Rule-based health recommendation engine.
//!
//! Pure function from an optional latest reading to an ordered, non-empty
//! list of advisory strings. The first tip always comes from a five-way
//! AQI band (breakpoints 50/100/150/200, boundary values in the lower
//! band); conditional tips follow in a fixed order. No randomness and no
//! side effects, so identical readings always produce identical advice.

use crate::models::SensorReading;

// ---

const NO_DATA_TIP: &str =
    "Connect your AeroSense sensors to start receiving actionable recommendations.";

const BAND_TIPS: [&str; 5] = [
    "Outdoor activities are safe. Keep windows open to refresh indoor air.",
    "Sensitive groups should limit prolonged outdoor exertion during peak hours.",
    "Use air purifiers indoors and consider wearing light masks outdoors.",
    "Everyone should reduce outdoor activities and wear N95 masks.",
    "Stay indoors with air filtration running and seal windows to reduce inflow.",
];

const FILTER_TIP: &str = "Schedule a filter replacement; PM2.5 levels are elevated.";
const VENTILATION_TIP: &str = "Increase ventilation to control CO₂ buildup indoors.";
const HUMIDIFIER_TIP: &str = "Low humidity detected. Consider using a humidifier.";
const DEHUMIDIFIER_TIP: &str = "High humidity; dehumidifiers can prevent mold growth.";

/// Build the advisory list for the given reading.
pub fn recommendations(reading: Option<&SensorReading>) -> Vec<String> {
    // ---
    let Some(reading) = reading else {
        return vec![NO_DATA_TIP.to_string()];
    };

    let mut tips = Vec::new();

    let band = match reading.aqi {
        aqi if aqi <= 50 => 0,
        aqi if aqi <= 100 => 1,
        aqi if aqi <= 150 => 2,
        aqi if aqi <= 200 => 3,
        _ => 4,
    };
    tips.push(BAND_TIPS[band].to_string());

    if reading.pm25 > 55.0 {
        tips.push(FILTER_TIP.to_string());
    }

    if reading.co2 > 1000.0 {
        tips.push(VENTILATION_TIP.to_string());
    }

    if reading.humidity < 30.0 {
        tips.push(HUMIDIFIER_TIP.to_string());
    } else if reading.humidity > 70.0 {
        tips.push(DEHUMIDIFIER_TIP.to_string());
    }

    tips
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{TimeZone, Utc};

    fn reading(aqi: i32, pm25: f64, co2: f64, humidity: f64) -> SensorReading {
        // ---
        let category = crate::aqi::category(f64::from(aqi));
        SensorReading {
            id: "test".to_string(),
            city: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            latitude: 17.385,
            longitude: 78.4867,
            pm25,
            pm10: pm25 * 2.0,
            co2,
            no2: 30.0,
            temperature: 31.0,
            humidity,
            aqi,
            category: category.to_string(),
            color: crate::aqi::color_for(category).to_string(),
            health: crate::aqi::health_for(category).to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            primary_pollutant: None,
        }
    }

    #[test]
    fn test_no_reading_gives_placeholder() {
        // ---
        let tips = recommendations(None);
        assert_eq!(tips, vec![NO_DATA_TIP.to_string()]);
    }

    #[test]
    fn test_band_tip_always_first() {
        // ---
        let good = reading(42, 20.0, 500.0, 50.0);
        assert_eq!(recommendations(Some(&good))[0], BAND_TIPS[0]);

        let severe = reading(250, 20.0, 500.0, 50.0);
        assert_eq!(recommendations(Some(&severe))[0], BAND_TIPS[4]);
    }

    #[test]
    fn test_band_boundaries_fall_in_lower_band() {
        // ---
        for (aqi, expected) in [(50, 0), (100, 1), (150, 2), (200, 3), (201, 4)] {
            let r = reading(aqi, 20.0, 500.0, 50.0);
            assert_eq!(
                recommendations(Some(&r))[0],
                BAND_TIPS[expected],
                "wrong band for aqi={aqi}"
            );
        }
    }

    #[test]
    fn test_pm25_filter_trigger() {
        // ---
        let elevated = reading(60, 56.0, 500.0, 50.0);
        assert!(recommendations(Some(&elevated)).contains(&FILTER_TIP.to_string()));

        // 55 exactly does not trigger.
        let at_threshold = reading(60, 55.0, 500.0, 50.0);
        assert!(!recommendations(Some(&at_threshold)).contains(&FILTER_TIP.to_string()));
    }

    #[test]
    fn test_humidity_tips_mutually_exclusive() {
        // ---
        let dry = recommendations(Some(&reading(60, 20.0, 500.0, 25.0)));
        assert!(dry.contains(&HUMIDIFIER_TIP.to_string()));
        assert!(!dry.contains(&DEHUMIDIFIER_TIP.to_string()));

        let humid = recommendations(Some(&reading(60, 20.0, 500.0, 80.0)));
        assert!(humid.contains(&DEHUMIDIFIER_TIP.to_string()));
        assert!(!humid.contains(&HUMIDIFIER_TIP.to_string()));

        let comfortable = recommendations(Some(&reading(60, 20.0, 500.0, 50.0)));
        assert!(!comfortable.contains(&HUMIDIFIER_TIP.to_string()));
        assert!(!comfortable.contains(&DEHUMIDIFIER_TIP.to_string()));
    }

    #[test]
    fn test_full_stack_ordering() {
        // ---
        // aqi 160 / pm25 60 / co2 1100 / humidity 25 trips everything.
        let r = reading(160, 60.0, 1100.0, 25.0);
        let tips = recommendations(Some(&r));
        assert_eq!(
            tips,
            vec![
                BAND_TIPS[3].to_string(),
                FILTER_TIP.to_string(),
                VENTILATION_TIP.to_string(),
                HUMIDIFIER_TIP.to_string(),
            ]
        );
    }

    #[test]
    fn test_output_never_empty() {
        // ---
        for aqi in [0, 50, 99, 151, 400] {
            let r = reading(aqi, 10.0, 400.0, 50.0);
            assert!(!recommendations(Some(&r)).is_empty());
        }
        assert!(!recommendations(None).is_empty());
    }
}
