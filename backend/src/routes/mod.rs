//! Route definitions for the Event Weather Planner

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Event management
        .nest("/events", event_routes())
        // Ad-hoc weather lookups
        .nest("/weather", weather_routes())
}

/// Event management routes
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_events).post(handlers::create_event))
        .route(
            "/:event_id",
            get(handlers::get_event).put(handlers::update_event),
        )
        .route("/:event_id/weather-check", post(handlers::check_event_weather))
        .route("/:event_id/suitability", get(handlers::get_event_suitability))
        .route("/:event_id/alternatives", get(handlers::get_event_alternatives))
}

/// Weather lookup routes
fn weather_routes() -> Router<AppState> {
    Router::new().route("/:location/:date", get(handlers::get_location_weather))
}
