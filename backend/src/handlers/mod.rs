//! HTTP handlers for the Event Weather Planner

pub mod event;
pub mod health;
pub mod weather;

pub use event::*;
pub use health::*;
pub use weather::*;
