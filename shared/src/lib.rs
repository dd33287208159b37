//! Shared types and models for the Event Weather Planner
//!
//! This crate contains the domain model, the suitability scoring engine,
//! and input validation used by the backend service.

pub mod models;
pub mod scoring;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
