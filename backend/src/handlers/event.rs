//! HTTP handlers for event management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::event::{
    AlternativesResponse, CreateEventInput, Event, EventService, SuitabilityResponse,
    UpdateEventInput, WeatherCheckResponse,
};
use crate::AppState;

fn service(state: AppState) -> EventService {
    EventService::new(state.db, state.gateway)
}

/// Create an event
pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<CreateEventInput>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let event = service(state).create(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// List all events
pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<Event>>> {
    let events = service(state).list().await?;
    Ok(Json(events))
}

/// Get an event by ID
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<Event>> {
    let event = service(state).get(event_id).await?;
    Ok(Json(event))
}

/// Update an event
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(input): Json<UpdateEventInput>,
) -> AppResult<Json<Event>> {
    let event = service(state).update(event_id, input).await?;
    Ok(Json(event))
}

/// Run a weather check for an event, overwriting its stored analysis
pub async fn check_event_weather(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<WeatherCheckResponse>> {
    let response = service(state).check_weather(event_id).await?;
    Ok(Json(response))
}

/// Read the stored suitability assessment for an event
pub async fn get_event_suitability(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<SuitabilityResponse>> {
    let response = service(state).suitability(event_id).await?;
    Ok(Json(response))
}

/// Suggest alternative dates for an event
pub async fn get_event_alternatives(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<AlternativesResponse>> {
    let response = service(state).alternatives(event_id).await?;
    Ok(Json(response))
}
