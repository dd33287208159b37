//! Event management service
//!
//! CRUD over stored events plus the orchestration that ties the weather
//! gateway and the scoring engine together per event: weather checks,
//! suitability reads, and alternative-date suggestions.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{
    EventCategory, ScoredSample, SuitabilityLevel, WeatherAnalysis, WeatherSample,
};
use shared::scoring;
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::services::weather::{suggest_alternatives, WeatherGateway};

/// Event service for managing stored events
#[derive(Clone)]
pub struct EventService {
    db: PgPool,
    gateway: WeatherGateway,
}

/// Stored event record. The embedded weather analysis is a JSONB document
/// overwritten wholesale on each weather check.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    /// Resolved location name, not the raw input string
    pub location: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub country: String,
    pub event_date: DateTime<Utc>,
    pub category: String,
    pub description: Option<String>,
    pub weather_analysis: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Parsed event category; unknown stored values fall back to `other`
    pub fn category(&self) -> EventCategory {
        self.category.parse().unwrap_or(EventCategory::Other)
    }

    /// Decode the stored weather analysis, if a check has been run
    pub fn analysis(&self) -> Option<WeatherAnalysis> {
        self.weather_analysis
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}

/// Input for creating an event
#[derive(Debug, Deserialize)]
pub struct CreateEventInput {
    pub name: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub category: EventCategory,
    pub description: Option<String>,
}

/// Input for updating an event; absent fields keep their stored values
#[derive(Debug, Deserialize)]
pub struct UpdateEventInput {
    pub name: Option<String>,
    pub location: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<EventCategory>,
    pub description: Option<String>,
}

/// Response for a weather check
#[derive(Debug, Serialize)]
pub struct WeatherCheckResponse {
    pub event: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub weather: WeatherAnalysis,
    pub suitability_level: SuitabilityLevel,
}

/// Response for a suitability read
#[derive(Debug, Serialize)]
pub struct SuitabilityResponse {
    pub event_name: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub suitability_score: i32,
    pub suitability_level: SuitabilityLevel,
    pub recommendation: String,
    pub last_checked: DateTime<Utc>,
}

/// Response for alternative-date suggestions
#[derive(Debug, Serialize)]
pub struct AlternativesResponse {
    pub original_event: OriginalEventSummary,
    pub alternatives: Vec<AlternativeSummary>,
}

#[derive(Debug, Serialize)]
pub struct OriginalEventSummary {
    pub name: String,
    pub date: DateTime<Utc>,
    pub current_score: i32,
}

#[derive(Debug, Serialize)]
pub struct AlternativeSummary {
    pub date: NaiveDate,
    pub suitability_score: i32,
    pub suitability_level: SuitabilityLevel,
    pub weather: AlternativeWeather,
    pub recommendation: String,
}

#[derive(Debug, Serialize)]
pub struct AlternativeWeather {
    pub temperature_celsius: Decimal,
    pub condition: String,
    pub precipitation_probability_percent: Decimal,
    pub wind_speed_kmh: Decimal,
}

const EVENT_COLUMNS: &str = "id, name, location, latitude, longitude, country, event_date, \
                             category, description, weather_analysis, created_at, updated_at";

impl EventService {
    /// Create a new EventService instance
    pub fn new(db: PgPool, gateway: WeatherGateway) -> Self {
        Self { db, gateway }
    }

    /// Create an event, resolving its location through the gateway first
    pub async fn create(&self, input: CreateEventInput) -> AppResult<Event> {
        validate_field("name", validation::validate_event_name(&input.name))?;
        validate_field("location", validation::validate_location(&input.location))?;

        let resolved = self.gateway.resolve_location(&input.location).await?;
        validate_field(
            "location",
            validation::validate_coordinates(
                resolved.coordinates.latitude,
                resolved.coordinates.longitude,
            ),
        )?;

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (name, location, latitude, longitude, country, event_date, category, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(input.name.trim())
        .bind(&resolved.name)
        .bind(resolved.coordinates.latitude)
        .bind(resolved.coordinates.longitude)
        .bind(&resolved.country)
        .bind(input.date)
        .bind(input.category.as_str())
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(event)
    }

    /// List all events, newest first
    pub async fn list(&self) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC",
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(events)
    }

    /// Get an event by ID
    pub async fn get(&self, event_id: Uuid) -> AppResult<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1",
        ))
        .bind(event_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event".to_string()))?;

        Ok(event)
    }

    /// Update an event. A changed location is re-resolved through the
    /// gateway; other fields keep their stored values when absent.
    pub async fn update(&self, event_id: Uuid, input: UpdateEventInput) -> AppResult<Event> {
        let existing = self.get(event_id).await?;

        let name = match input.name {
            Some(name) => {
                validate_field("name", validation::validate_event_name(&name))?;
                name.trim().to_string()
            }
            None => existing.name,
        };

        let (location, latitude, longitude, country) = match input.location {
            Some(location) => {
                validate_field("location", validation::validate_location(&location))?;
                let resolved = self.gateway.resolve_location(&location).await?;
                validate_field(
                    "location",
                    validation::validate_coordinates(
                        resolved.coordinates.latitude,
                        resolved.coordinates.longitude,
                    ),
                )?;
                (
                    resolved.name,
                    resolved.coordinates.latitude,
                    resolved.coordinates.longitude,
                    resolved.country,
                )
            }
            None => (
                existing.location,
                existing.latitude,
                existing.longitude,
                existing.country,
            ),
        };

        let event_date = input.date.unwrap_or(existing.event_date);
        let category = input
            .category
            .map(|c| c.as_str().to_string())
            .unwrap_or(existing.category);
        let description = input.description.or(existing.description);

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = $1, location = $2, latitude = $3, longitude = $4, country = $5,
                event_date = $6, category = $7, description = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING {EVENT_COLUMNS}
            "#,
        ))
        .bind(&name)
        .bind(&location)
        .bind(latitude)
        .bind(longitude)
        .bind(&country)
        .bind(event_date)
        .bind(&category)
        .bind(&description)
        .bind(event_id)
        .fetch_one(&self.db)
        .await?;

        Ok(event)
    }

    /// Run a weather check: fetch current conditions and forecast through
    /// the gateway, score them, and overwrite the stored analysis.
    pub async fn check_weather(&self, event_id: Uuid) -> AppResult<WeatherCheckResponse> {
        let event = self.get(event_id).await?;
        let category = event.category();

        let current = self
            .gateway
            .current_weather(event.latitude, event.longitude)
            .await?;
        let forecast = self
            .gateway
            .forecast(event.latitude, event.longitude)
            .await?;

        let analysis = build_analysis(current, forecast, category, self.gateway.now());

        let analysis_json = serde_json::to_value(&analysis)
            .map_err(|e| AppError::Internal(format!("failed to encode weather analysis: {}", e)))?;

        sqlx::query("UPDATE events SET weather_analysis = $1, updated_at = NOW() WHERE id = $2")
            .bind(&analysis_json)
            .bind(event_id)
            .execute(&self.db)
            .await?;

        let suitability_level = scoring::level(analysis.current.suitability_score);

        Ok(WeatherCheckResponse {
            event: event.name,
            location: event.location,
            date: event.event_date,
            weather: analysis,
            suitability_level,
        })
    }

    /// Read the stored suitability assessment for an event
    pub async fn suitability(&self, event_id: Uuid) -> AppResult<SuitabilityResponse> {
        let event = self.get(event_id).await?;

        let analysis = event.analysis().ok_or_else(|| {
            AppError::ValidationError(
                "Weather analysis not available. Please run weather check first.".to_string(),
            )
        })?;

        let score = analysis.current.suitability_score;
        let recommendation = analysis
            .current
            .recommendation
            .unwrap_or_else(|| scoring::recommendation(score).to_string());

        Ok(SuitabilityResponse {
            event_name: event.name,
            location: event.location,
            date: event.event_date,
            suitability_score: score,
            suitability_level: scoring::level(score),
            recommendation,
            last_checked: analysis.last_checked,
        })
    }

    /// Suggest up to three alternative dates with better conditions
    pub async fn alternatives(&self, event_id: Uuid) -> AppResult<AlternativesResponse> {
        let event = self.get(event_id).await?;
        let category = event.category();

        let forecast = self
            .gateway
            .forecast(event.latitude, event.longitude)
            .await?;

        let current_score = event
            .analysis()
            .map(|a| a.current.suitability_score)
            .unwrap_or(0);

        let alternatives = suggest_alternatives(&forecast, category)
            .into_iter()
            .map(|alt| AlternativeSummary {
                date: alt.date,
                suitability_score: alt.assessment.score,
                suitability_level: alt.assessment.level,
                weather: AlternativeWeather {
                    temperature_celsius: alt.sample.temperature_celsius,
                    condition: alt.sample.condition.clone(),
                    precipitation_probability_percent: alt
                        .sample
                        .precipitation_probability_percent
                        .unwrap_or_default(),
                    wind_speed_kmh: alt.sample.wind_speed_kmh,
                },
                recommendation: alt.assessment.recommendation,
            })
            .collect();

        Ok(AlternativesResponse {
            original_event: OriginalEventSummary {
                name: event.name,
                date: event.event_date,
                current_score,
            },
            alternatives,
        })
    }
}

/// Assemble the analysis document persisted by a weather check: the
/// scored current conditions plus the first five scored forecast steps.
/// Only the current sample carries a recommendation string.
pub fn build_analysis(
    current: WeatherSample,
    forecast: Vec<WeatherSample>,
    category: EventCategory,
    last_checked: DateTime<Utc>,
) -> WeatherAnalysis {
    let assessment = scoring::assess(&current, category);

    WeatherAnalysis {
        last_checked,
        current: ScoredSample {
            sample: current,
            suitability_score: assessment.score,
            recommendation: Some(assessment.recommendation),
        },
        forecast: forecast
            .into_iter()
            .take(5)
            .map(|sample| {
                let score = scoring::score(&sample, category);
                ScoredSample {
                    sample,
                    suitability_score: score,
                    recommendation: None,
                }
            })
            .collect(),
    }
}

fn validate_field(field: &str, result: Result<(), &'static str>) -> AppResult<()> {
    result.map_err(|message| AppError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    })
}
