//! Weather gateway: cached access to the weather provider
//!
//! Wraps the provider client with a shared TTL cache and owns the
//! date-matching and alternative-date logic. A cache hit short-circuits
//! the upstream call entirely; staleness is bounded only by the TTL.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};

use shared::models::{EventCategory, SuitabilityAssessment, WeatherSample};
use shared::scoring;
use shared::types::ResolvedLocation;

use crate::cache::{Clock, TtlCache};
use crate::error::{AppError, AppResult};
use crate::external::weather::WeatherClient;

/// Gateway to the weather provider. Cheap to clone; the cache and clock
/// are shared.
#[derive(Clone)]
pub struct WeatherGateway {
    client: WeatherClient,
    cache: Arc<TtlCache>,
    clock: Arc<dyn Clock>,
    horizon_days: i64,
}

/// Outcome of matching a target date against the available weather data
#[derive(Debug, Clone, PartialEq)]
pub enum DateMatch {
    /// Target date is today; use current conditions
    Current,
    /// First forecast entry valid on the target day
    Entry(WeatherSample),
    /// Date is in range but the provider has no entry for it. This is a
    /// soft outcome, not an error.
    Unavailable,
}

/// Weather resolved for a specific date
#[derive(Debug, Clone, PartialEq)]
pub enum DateWeather {
    Current(WeatherSample),
    Forecast(WeatherSample),
    Unavailable,
}

/// A suggested alternative date with its day-representative sample
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeDate {
    pub date: NaiveDate,
    pub sample: WeatherSample,
    pub assessment: SuitabilityAssessment,
}

impl WeatherGateway {
    pub fn new(
        client: WeatherClient,
        cache: Arc<TtlCache>,
        clock: Arc<dyn Clock>,
        horizon_days: i64,
    ) -> Self {
        Self {
            client,
            cache,
            clock,
            horizon_days,
        }
    }

    /// Resolve a location string to coordinates, cached per distinct name
    pub async fn resolve_location(&self, name: &str) -> AppResult<ResolvedLocation> {
        let key = format!("coords:{}", name);
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let resolved = self.client.geocode(name).await?;
        self.store(&key, &resolved);
        Ok(resolved)
    }

    /// Current conditions for a coordinate pair, cached
    pub async fn current_weather(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<WeatherSample> {
        let key = format!("current:{}:{}", latitude, longitude);
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let sample = self.client.current_weather(latitude, longitude).await?;
        self.store(&key, &sample);
        Ok(sample)
    }

    /// Forecast steps for a coordinate pair, cached as one ordered unit
    pub async fn forecast(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<Vec<WeatherSample>> {
        let key = format!("forecast:{}:{}", latitude, longitude);
        if let Some(cached) = self.cached(&key) {
            return Ok(cached);
        }

        let samples = self.client.forecast(latitude, longitude).await?;
        self.store(&key, &samples);
        Ok(samples)
    }

    /// Resolve the weather for a target date at a location. Today resolves
    /// through current conditions; future dates inside the horizon go
    /// through the forecast.
    pub async fn weather_for_date(
        &self,
        location: &ResolvedLocation,
        target: NaiveDate,
    ) -> AppResult<DateWeather> {
        let today = self.clock.now().date_naive();
        let lat = location.coordinates.latitude;
        let lon = location.coordinates.longitude;

        // Run the range checks before fetching anything upstream
        if let DateMatch::Current = match_forecast_date(target, today, self.horizon_days, &[])? {
            let sample = self.current_weather(lat, lon).await?;
            return Ok(DateWeather::Current(sample));
        }

        let forecast = self.forecast(lat, lon).await?;
        match match_forecast_date(target, today, self.horizon_days, &forecast)? {
            DateMatch::Current => unreachable!("current handled above"),
            DateMatch::Entry(sample) => Ok(DateWeather::Forecast(sample)),
            DateMatch::Unavailable => Ok(DateWeather::Unavailable),
        }
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.cache
            .get(key)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(json) = serde_json::to_value(value) {
            self.cache.insert(key, json);
        }
    }
}

/// Match a target date against the forecast at day granularity.
///
/// Today resolves to `Current`; past dates and dates beyond the horizon
/// fail; an in-range date with no matching forecast entry is reported as
/// `Unavailable` rather than failing the request.
pub fn match_forecast_date(
    target: NaiveDate,
    today: NaiveDate,
    horizon_days: i64,
    forecast: &[WeatherSample],
) -> AppResult<DateMatch> {
    if target == today {
        return Ok(DateMatch::Current);
    }
    if target < today {
        return Err(AppError::PastDate);
    }
    if target > today + Duration::days(horizon_days) {
        return Err(AppError::HorizonExceeded(horizon_days));
    }

    let entry = forecast
        .iter()
        .find(|sample| sample.observed_at.date_naive() == target);

    Ok(match entry {
        Some(sample) => DateMatch::Entry(sample.clone()),
        None => DateMatch::Unavailable,
    })
}

/// Suggest alternative dates from a forecast.
///
/// Each calendar day is represented by its warmest entry; representatives
/// scoring 40 or below are discarded, the rest are sorted by score
/// descending and capped at three.
pub fn suggest_alternatives(
    forecast: &[WeatherSample],
    category: EventCategory,
) -> Vec<AlternativeDate> {
    let mut daily: Vec<(NaiveDate, &WeatherSample)> = Vec::new();

    for sample in forecast {
        let date = sample.observed_at.date_naive();
        match daily.iter_mut().find(|(d, _)| *d == date) {
            Some(entry) => {
                if sample.temperature_celsius > entry.1.temperature_celsius {
                    entry.1 = sample;
                }
            }
            None => daily.push((date, sample)),
        }
    }

    let mut alternatives: Vec<AlternativeDate> = daily
        .into_iter()
        .map(|(date, sample)| AlternativeDate {
            date,
            sample: sample.clone(),
            assessment: scoring::assess(sample, category),
        })
        .filter(|alt| alt.assessment.score > 40)
        .collect();

    alternatives.sort_by(|a, b| b.assessment.score.cmp(&a.assessment.score));
    alternatives.truncate(3);
    alternatives
}
