use anyhow::Result;
use chrono::Duration;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use aerosense_backend::{app, Config, Feed};
use aerosense_backend::models::{ForecastBundle, HistoryPayload, LatestPayload, MapData};

// ---

/// Boot the service in mock mode on an ephemeral port and return its base URL.
async fn spawn_app() -> Result<String> {
    // ---
    let cfg = Config {
        feed_url: None,
        port: 0,
        history_limit: 500,
        geojson_path: None,
    };
    let feed = Feed::from_config(&cfg);
    let router = app(feed, cfg);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server task");
    });

    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn latest_endpoint_serves_full_roster() -> Result<()> {
    // ---
    let base = spawn_app().await?;
    let client = Client::new();

    let payload: LatestPayload = client
        .get(format!("{base}/latest"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(payload.readings.len(), 5, "expected one reading per city");
    assert_eq!(payload.palette.len(), 6, "expected the full category palette");
    assert!(payload.alerts.is_empty(), "mock latest carries no alerts");

    for r in &payload.readings {
        // Derived fields must be consistent with the index.
        assert_eq!(r.category, aerosense_backend::aqi::category(f64::from(r.aqi)));
        assert_eq!(r.color, aerosense_backend::aqi::color_for(&r.category));
        assert!((45..=85).contains(&r.aqi), "base aqi out of band: {}", r.aqi);
    }

    // Same process, same city: the base band is deterministic.
    let again: LatestPayload = client
        .get(format!("{base}/latest"))
        .send()
        .await?
        .json()
        .await?;
    for (a, b) in payload.readings.iter().zip(again.readings.iter()) {
        assert_eq!(a.city, b.city);
        assert_eq!(a.aqi, b.aqi, "base aqi drifted for {}", a.city);
    }

    Ok(())
}

#[tokio::test]
async fn history_endpoint_honors_limit_and_order() -> Result<()> {
    // ---
    let base = spawn_app().await?;
    let client = Client::new();

    let payload: HistoryPayload = client
        .get(format!("{base}/history?city=Hyderabad&limit=50"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(payload.city, "Hyderabad");
    assert_eq!(payload.readings.len(), 50);

    for pair in payload.readings.windows(2) {
        assert!(
            pair[0].timestamp < pair[1].timestamp,
            "history must be chronological ascending"
        );
    }
    for r in &payload.readings {
        assert!((0..=500).contains(&r.aqi), "aqi escaped clamp: {}", r.aqi);
    }

    Ok(())
}

#[tokio::test]
async fn history_endpoint_requires_city() -> Result<()> {
    // ---
    let base = spawn_app().await?;
    let client = Client::new();

    let response = client.get(format!("{base}/history?limit=10")).send().await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await?;
    assert_eq!(body["error"], "city parameter is required");

    Ok(())
}

#[tokio::test]
async fn predict_endpoint_returns_24_hourly_points() -> Result<()> {
    // ---
    let base = spawn_app().await?;
    let client = Client::new();

    let bundle: ForecastBundle = client
        .get(format!("{base}/predict?city=Warangal"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(bundle.points.len(), 24);
    assert_eq!(bundle.model_name, "Mock Forecast Model");

    for pair in bundle.points.windows(2) {
        assert_eq!(
            pair[1].target_time - pair[0].target_time,
            Duration::hours(1),
            "forecast points must step exactly one hour"
        );
    }
    for p in &bundle.points {
        assert!((0..=500).contains(&p.predicted_aqi));
        let confidence = p.confidence.expect("mock forecast carries confidence");
        assert!((0.75..=0.95).contains(&confidence));
    }

    let metrics = bundle.metrics.expect("mock forecast carries metrics");
    assert_eq!(metrics.training_records, 1000);

    Ok(())
}

#[tokio::test]
async fn mapdata_endpoint_includes_boundaries() -> Result<()> {
    // ---
    let base = spawn_app().await?;
    let client = Client::new();

    let data: MapData = client
        .get(format!("{base}/mapdata"))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(data.cities.len(), 5);
    assert_eq!(data.geojson["type"], "FeatureCollection");

    for row in &data.cities {
        assert!(!row.city.is_empty());
        assert!(row.location[0] != 0.0 && row.location[1] != 0.0);
        assert_eq!(row.category, aerosense_backend::aqi::category(f64::from(row.aqi)));
    }

    Ok(())
}

#[tokio::test]
async fn recommendations_endpoint_handles_known_and_unknown_cities() -> Result<()> {
    // ---
    let base = spawn_app().await?;
    let client = Client::new();

    let known: Value = client
        .get(format!("{base}/recommendations?city=Hyderabad"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(known["city"], "Hyderabad");
    let tips = known["tips"].as_array().expect("tips array");
    assert!(!tips.is_empty(), "advice list is never empty");

    // Unknown city falls through to the no-data placeholder.
    let unknown: Value = client
        .get(format!("{base}/recommendations?city=Atlantis"))
        .send()
        .await?
        .json()
        .await?;
    assert!(unknown["city"].is_null());
    let tips = unknown["tips"].as_array().expect("tips array");
    assert_eq!(tips.len(), 1);
    assert!(tips[0]
        .as_str()
        .unwrap()
        .contains("Connect your AeroSense sensors"));

    Ok(())
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    // ---
    let base = spawn_app().await?;
    let client = Client::new();

    let body: Value = client
        .get(format!("{base}/health"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["status"], "ok");

    Ok(())
}
