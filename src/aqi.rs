//! AQI scale tables and pollutant-to-index computation.
//!
//! The six-band EPA-style scale drives every derived field in the service:
//! `category(aqi)` is a step function over breakpoints {50, 100, 150, 200,
//! 300} with each band inclusive on its upper bound, and `color_for` /
//! `health_for` are fixed lookups keyed by category name with explicit
//! fallback entries. Per-pollutant breakpoint tables let `compute_aqi`
//! rebuild the overall index from raw concentrations when an upstream feed
//! sends pollutants without (or with stale) derived fields.

use std::collections::HashMap;

// ---

/// One band of the AQI scale.
#[derive(Debug, Clone, Copy)]
pub struct AqiBand {
    // ---
    pub name: &'static str,
    /// Inclusive `(low, high)` AQI range covered by this band.
    pub range: (i32, i32),
    pub color: &'static str,
    pub health: &'static str,
}

/// The full scale, ordered from cleanest to worst.
pub const AQI_SCALE: [AqiBand; 6] = [
    AqiBand {
        name: "Good",
        range: (0, 50),
        color: "#00E400",
        health: "Air quality is satisfactory.",
    },
    AqiBand {
        name: "Moderate",
        range: (51, 100),
        color: "#FFFF00",
        health: "Acceptable; some pollutants may be a moderate concern.",
    },
    AqiBand {
        name: "Unhealthy for Sensitive Groups",
        range: (101, 150),
        color: "#FF7E00",
        health: "Sensitive groups should limit outdoor exertion.",
    },
    AqiBand {
        name: "Unhealthy",
        range: (151, 200),
        color: "#FF0000",
        health: "Everyone may begin to experience effects.",
    },
    AqiBand {
        name: "Very Unhealthy",
        range: (201, 300),
        color: "#8F3F97",
        health: "Health warnings of emergency conditions.",
    },
    AqiBand {
        name: "Hazardous",
        range: (301, 500),
        color: "#7E0023",
        health: "Serious risk for entire population.",
    },
];

/// Neutral gray used when a category name is not on the scale.
pub const FALLBACK_COLOR: &str = "#9ca3af";

/// Advisory used when no category (or no pollutant data) is available.
pub const FALLBACK_HEALTH: &str = "Insufficient data";

// ---

/// Map an AQI value to its category name.
///
/// Boundary values (50, 100, 150, 200, 300) belong to the lower band;
/// anything above 300 is "Hazardous".
pub fn category(aqi: f64) -> &'static str {
    // ---
    if aqi <= 50.0 {
        "Good"
    } else if aqi <= 100.0 {
        "Moderate"
    } else if aqi <= 150.0 {
        "Unhealthy for Sensitive Groups"
    } else if aqi <= 200.0 {
        "Unhealthy"
    } else if aqi <= 300.0 {
        "Very Unhealthy"
    } else {
        "Hazardous"
    }
}

/// Display color for a category name, gray for anything unrecognized.
pub fn color_for(category: &str) -> &'static str {
    // ---
    AQI_SCALE
        .iter()
        .find(|band| band.name == category)
        .map(|band| band.color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Health advisory sentence for a category name.
pub fn health_for(category: &str) -> &'static str {
    // ---
    AQI_SCALE
        .iter()
        .find(|band| band.name == category)
        .map(|band| band.health)
        .unwrap_or(FALLBACK_HEALTH)
}

/// Category-to-color palette included in the `/latest` payload.
pub fn palette() -> HashMap<String, String> {
    // ---
    AQI_SCALE
        .iter()
        .map(|band| (band.name.to_string(), band.color.to_string()))
        .collect()
}

// ---

/// `(concentration_low, concentration_high, aqi_low, aqi_high)` segments.
type Breakpoints = &'static [(f64, f64, i32, i32)];

const PM25_BREAKPOINTS: Breakpoints = &[
    (0.0, 12.0, 0, 50),
    (12.1, 35.4, 51, 100),
    (35.5, 55.4, 101, 150),
    (55.5, 150.4, 151, 200),
    (150.5, 250.4, 201, 300),
    (250.5, 350.4, 301, 400),
    (350.5, 500.4, 401, 500),
];

const PM10_BREAKPOINTS: Breakpoints = &[
    (0.0, 54.0, 0, 50),
    (55.0, 154.0, 51, 100),
    (155.0, 254.0, 101, 150),
    (255.0, 354.0, 151, 200),
    (355.0, 424.0, 201, 300),
    (425.0, 504.0, 301, 400),
    (505.0, 604.0, 401, 500),
];

const NO2_BREAKPOINTS: Breakpoints = &[
    (0.0, 53.0, 0, 50),
    (54.0, 100.0, 51, 100),
    (101.0, 360.0, 101, 150),
    (361.0, 649.0, 151, 200),
    (650.0, 1249.0, 201, 300),
    (1250.0, 1649.0, 301, 400),
    (1650.0, 2049.0, 401, 500),
];

const CO2_BREAKPOINTS: Breakpoints = &[
    (0.0, 600.0, 0, 50),
    (601.0, 1000.0, 51, 100),
    (1001.0, 1500.0, 101, 150),
    (1501.0, 2000.0, 151, 200),
    (2001.0, 5000.0, 201, 300),
    (5001.0, 10000.0, 301, 400),
    (10001.0, 20000.0, 401, 500),
];

/// Overall AQI rebuilt from raw pollutant concentrations.
#[derive(Debug, Clone)]
pub struct AqiSummary {
    // ---
    pub aqi: i32,
    pub category: &'static str,
    pub color: &'static str,
    pub health: &'static str,
    pub primary_pollutant: Option<&'static str>,
}

fn linear_scale(value: f64, bp: (f64, f64, i32, i32)) -> f64 {
    // ---
    let (bp_low, bp_high, aqi_low, aqi_high) = bp;
    (f64::from(aqi_high - aqi_low) / (bp_high - bp_low)) * (value - bp_low) + f64::from(aqi_low)
}

fn aqi_for_pollutant(breakpoints: Breakpoints, value: Option<f64>) -> Option<f64> {
    // ---
    let value = value?;
    for &bp in breakpoints {
        if bp.0 <= value && value <= bp.1 {
            return Some(linear_scale(value, bp));
        }
    }

    // Off-scale concentrations extrapolate on the last segment.
    let last = *breakpoints.last()?;
    (value > last.1).then(|| linear_scale(value, last))
}

/// Compute the overall AQI from whichever pollutant values are present.
///
/// The dominant pollutant is the one whose sub-index is highest. With no
/// usable pollutant at all the result is the zero/"Unknown" summary, which
/// is a valid answer rather than an error.
pub fn compute_aqi(
    pm25: Option<f64>,
    pm10: Option<f64>,
    co2: Option<f64>,
    no2: Option<f64>,
) -> AqiSummary {
    // ---
    let candidates = [
        ("pm25", aqi_for_pollutant(PM25_BREAKPOINTS, pm25)),
        ("pm10", aqi_for_pollutant(PM10_BREAKPOINTS, pm10)),
        ("co2", aqi_for_pollutant(CO2_BREAKPOINTS, co2)),
        ("no2", aqi_for_pollutant(NO2_BREAKPOINTS, no2)),
    ];

    let dominant = candidates
        .iter()
        .filter_map(|&(name, sub_index)| sub_index.map(|v| (name, v)))
        .max_by(|a, b| a.1.total_cmp(&b.1));

    match dominant {
        Some((pollutant, sub_index)) => {
            let aqi = sub_index.round() as i32;
            let category = category(f64::from(aqi));
            AqiSummary {
                aqi,
                category,
                color: color_for(category),
                health: health_for(category),
                primary_pollutant: Some(pollutant),
            }
        }
        None => AqiSummary {
            aqi: 0,
            category: "Unknown",
            color: FALLBACK_COLOR,
            health: FALLBACK_HEALTH,
            primary_pollutant: None,
        },
    }
}
