//! # Verdant Common Library
//!
//! Shared code for the Verdant environmental quality services including:
//! - Core domain types (samples, environmental records, scored points)
//! - Event types (VerdantEvent enum)
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    Coordinate, EnvironmentalRecord, GreenSpace, Sample, ScoreBreakdown, ScoredPoint,
    WeatherSeries,
};
