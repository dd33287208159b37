//! Business logic services for the Event Weather Planner

pub mod event;
pub mod weather;

pub use event::EventService;
pub use weather::WeatherGateway;
