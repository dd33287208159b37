//! Weather API client for fetching weather data
//!
//! Integrates with OpenWeatherMap for geocoding, current conditions, and
//! forecasts. This client is the sole translator between provider response
//! shapes and the canonical `WeatherSample`/`ResolvedLocation` types.

use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use shared::models::WeatherSample;
use shared::types::{GpsCoordinates, ResolvedLocation};

use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    geo_url: String,
}

/// OpenWeatherMap geocoding response entry
#[derive(Debug, Deserialize)]
struct OwmGeocodeEntry {
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    country: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    weather: Vec<OwmWeather>,
    main: OwmMain,
    wind: OwmWind,
    rain: Option<OwmRain>,
    dt: i64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

/// OpenWeatherMap API response for the 3-hour-step forecast
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    main: OwmMain,
    weather: Vec<OwmWeather>,
    wind: OwmWind,
    #[serde(default)]
    pop: f64,
    rain: Option<OwmForecastRain>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastRain {
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default()
}

/// Provider wind speeds are m/s; the canonical unit is km/h
fn wind_kmh(mps: f64) -> Decimal {
    decimal(mps * 3.6)
}

impl WeatherClient {
    /// Create a new WeatherClient against the production endpoints
    pub fn new(api_key: String) -> Self {
        Self::with_base_urls(
            api_key,
            "https://api.openweathermap.org/data/2.5".to_string(),
            "https://api.openweathermap.org/geo/1.0".to_string(),
        )
    }

    /// Create a new WeatherClient with custom base URLs (for testing)
    pub fn with_base_urls(api_key: String, base_url: String, geo_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            geo_url,
        }
    }

    /// Resolve a free-text location name to coordinates, taking the
    /// provider's first match
    pub async fn geocode(&self, location: &str) -> AppResult<ResolvedLocation> {
        // The raw location string goes through query encoding; it is
        // user-supplied free text
        let request = self
            .client
            .get(format!("{}/direct", self.geo_url))
            .query(&[("q", location), ("limit", "1"), ("appid", &self.api_key)]);

        let entries: Vec<OwmGeocodeEntry> = self.get_json(request).await?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LocationNotFound(location.to_string()))?;

        Ok(ResolvedLocation {
            coordinates: GpsCoordinates::new(decimal(entry.lat), decimal(entry.lon)),
            name: entry.name,
            country: entry.country,
        })
    }

    /// Fetch current weather conditions by GPS coordinates
    pub async fn current_weather(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<WeatherSample> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, latitude, longitude, self.api_key
        );

        let data: OwmCurrentResponse = self.get_json(self.client.get(url)).await?;
        Ok(convert_current(data))
    }

    /// Fetch the multi-step forecast by GPS coordinates. The provider
    /// returns 3-hour-resolution steps.
    pub async fn forecast(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<Vec<WeatherSample>> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            self.base_url, latitude, longitude, self.api_key
        );

        let data: OwmForecastResponse = self.get_json(self.client.get(url)).await?;
        Ok(data.list.into_iter().map(convert_forecast_item).collect())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("{} - {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse response: {}", e)))
    }
}

/// Convert an OpenWeatherMap current-conditions response into the
/// canonical sample shape. Precipitation comes from the rolling 1-hour
/// rain bucket, defaulting to zero.
fn convert_current(data: OwmCurrentResponse) -> WeatherSample {
    let weather = data.weather.first();

    WeatherSample {
        observed_at: DateTime::from_timestamp(data.dt, 0).unwrap_or_else(Utc::now),
        temperature_celsius: decimal(data.main.temp),
        humidity_percent: Some(data.main.humidity),
        wind_speed_kmh: wind_kmh(data.wind.speed),
        condition: weather.map(|w| w.main.clone()).unwrap_or_default(),
        description: weather.map(|w| w.description.clone()).unwrap_or_default(),
        precipitation_mm: data
            .rain
            .as_ref()
            .and_then(|r| r.one_hour)
            .map(decimal)
            .unwrap_or_default(),
        precipitation_probability_percent: None,
    }
}

/// Convert one 3-hour forecast step. Precipitation comes from the rolling
/// 3-hour bucket; probability is the provider's pop scaled to percent.
fn convert_forecast_item(item: OwmForecastItem) -> WeatherSample {
    let weather = item.weather.first();

    WeatherSample {
        observed_at: DateTime::from_timestamp(item.dt, 0).unwrap_or_else(Utc::now),
        temperature_celsius: decimal(item.main.temp),
        humidity_percent: None,
        wind_speed_kmh: wind_kmh(item.wind.speed),
        condition: weather.map(|w| w.main.clone()).unwrap_or_default(),
        description: weather.map(|w| w.description.clone()).unwrap_or_default(),
        precipitation_mm: item
            .rain
            .and_then(|r| r.three_hour)
            .map(decimal)
            .unwrap_or_default(),
        precipitation_probability_percent: Some(decimal(item.pop * 100.0)),
    }
}
