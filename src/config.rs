//! Configuration loader for the `aerosense-backend` service.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). Consolidating configuration here keeps
//! `env::var` calls from scattering through the codebase.

use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable, treating empty as unset.
macro_rules! optional_env {
    ($var_name:expr) => {
        env::var($var_name).ok().filter(|v| !v.trim().is_empty())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Upstream AeroSense API base URL; unset means mock mode.
    pub feed_url: Option<String>,

    /// TCP port the HTTP server binds to.
    pub port: u16,

    /// Hard cap on `limit` for `/history` requests.
    pub history_limit: u32,

    /// Optional path to a district-boundary GeoJSON FeatureCollection.
    pub geojson_path: Option<String>,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `AERO_FEED_URL` – upstream API base URL (unset/empty → mock telemetry)
/// - `AERO_PORT` – HTTP port (default: 8000)
/// - `AERO_HISTORY_LIMIT` – max history rows per request (default: 500)
/// - `AERO_GEOJSON_PATH` – map boundary file served by `/mapdata`
///
/// Returns an error if a numeric variable is present but unparseable.
pub fn load_from_env() -> Result<Config> {
    // ---
    let feed_url = optional_env!("AERO_FEED_URL");
    let geojson_path = optional_env!("AERO_GEOJSON_PATH");
    let port = parse_env_u32!("AERO_PORT", 8000);
    let history_limit = parse_env_u32!("AERO_HISTORY_LIMIT", 500);

    let port = u16::try_from(port).map_err(|_| anyhow!("Invalid AERO_PORT: {}", port))?;

    Ok(Config {
        feed_url,
        port,
        history_limit,
        geojson_path,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!(
            "  AERO_FEED_URL      : {}",
            self.feed_url.as_deref().unwrap_or("<mock telemetry>")
        );
        tracing::info!("  AERO_PORT          : {}", self.port);
        tracing::info!("  AERO_HISTORY_LIMIT : {}", self.history_limit);
        tracing::info!(
            "  AERO_GEOJSON_PATH  : {}",
            self.geojson_path.as_deref().unwrap_or("<none>")
        );
    }
}
