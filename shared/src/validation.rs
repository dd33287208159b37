//! Input validation for the Event Weather Planner

use rust_decimal::Decimal;

/// Validate an event name is present and non-blank
pub fn validate_event_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Event name is required");
    }
    if name.len() > 200 {
        return Err("Event name must be at most 200 characters");
    }
    Ok(())
}

/// Validate a location string before geocoding
pub fn validate_location(location: &str) -> Result<(), &'static str> {
    if location.trim().is_empty() {
        return Err("Location is required");
    }
    Ok(())
}

/// Validate GPS coordinates are in range
pub fn validate_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}
