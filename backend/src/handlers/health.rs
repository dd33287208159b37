//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::WeatherConfig;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
    pub database: &'static str,
    pub weather_provider: &'static str,
}

/// Service health: database connectivity plus whether the weather
/// provider is usable at all. The service starts without an API key, but
/// every weather operation fails upstream until one is configured.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected",
        Err(_) => "disconnected",
    };

    Json(HealthResponse {
        status: if database == "connected" {
            "healthy"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        database,
        weather_provider: provider_status(&state.config.weather),
    })
}

/// "configured" only when a non-blank API key is present
pub fn provider_status(weather: &WeatherConfig) -> &'static str {
    if weather.api_key.trim().is_empty() {
        "unconfigured"
    } else {
        "configured"
    }
}
