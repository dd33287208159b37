//! HTTP handlers for ad-hoc weather lookups

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use shared::models::WeatherSample;

use crate::error::{AppError, AppResult};
use crate::services::weather::DateWeather;
use crate::AppState;

/// Weather for a location and date. "Unavailable" is a successful
/// response carrying an explanatory message, not an error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LocationWeatherResponse {
    Matched {
        location: String,
        country: String,
        date: NaiveDate,
        weather: WeatherSample,
        #[serde(rename = "type")]
        kind: &'static str,
    },
    Unavailable {
        message: String,
        date: NaiveDate,
        location: String,
    },
}

/// Get weather for a specific location and date
pub async fn get_location_weather(
    State(state): State<AppState>,
    Path((location, date)): Path<(String, String)>,
) -> AppResult<Json<LocationWeatherResponse>> {
    let target = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError(format!("Invalid date: {}", date)))?;

    let resolved = state.gateway.resolve_location(&location).await?;

    let response = match state.gateway.weather_for_date(&resolved, target).await? {
        DateWeather::Current(weather) => LocationWeatherResponse::Matched {
            location: resolved.name,
            country: resolved.country,
            date: target,
            weather,
            kind: "current",
        },
        DateWeather::Forecast(weather) => LocationWeatherResponse::Matched {
            location: resolved.name,
            country: resolved.country,
            date: target,
            weather,
            kind: "forecast",
        },
        DateWeather::Unavailable => LocationWeatherResponse::Unavailable {
            message: "Forecast data not available for the requested date".to_string(),
            date: target,
            location: resolved.name,
        },
    };

    Ok(Json(response))
}
