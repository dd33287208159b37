//! Weather data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical normalized weather reading, shared by the current-conditions
/// and forecast paths. Forecast-only fields are optional rather than a
/// separate shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSample {
    /// Observation time for current conditions, validity time for
    /// forecast steps
    pub observed_at: DateTime<Utc>,
    pub temperature_celsius: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<i32>,
    /// Converted from the provider's m/s reading
    pub wind_speed_kmh: Decimal,
    /// Provider's coarse category: "Clear", "Clouds", "Mist", "Rain", ...
    pub condition: String,
    pub description: String,
    /// 1-hour rain bucket for current conditions, 3-hour bucket for
    /// forecast steps; 0 when the provider omits it
    pub precipitation_mm: Decimal,
    /// Forecast only; provider probability-of-precipitation x 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability_percent: Option<Decimal>,
}

/// Suitability level derived from a score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum SuitabilityLevel {
    Poor,
    Okay,
    Good,
}

/// Derived suitability assessment, never persisted independently of an
/// event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuitabilityAssessment {
    /// Heuristic rating in [0, 100]
    pub score: i32,
    pub level: SuitabilityLevel,
    pub recommendation: String,
}

/// A weather sample together with its suitability score. Only the
/// current-conditions sample carries a recommendation; forecast entries
/// store the score alone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredSample {
    #[serde(flatten)]
    pub sample: WeatherSample,
    pub suitability_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Weather analysis embedded in an event. Overwritten wholesale on each
/// weather check, never merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherAnalysis {
    pub last_checked: DateTime<Utc>,
    pub current: ScoredSample,
    /// Capped at 5 entries, in forecast order
    pub forecast: Vec<ScoredSample>,
}
