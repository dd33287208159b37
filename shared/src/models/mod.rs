//! Domain models for the Event Weather Planner

mod event;
mod weather;

pub use event::*;
pub use weather::*;
