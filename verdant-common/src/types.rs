//! Core domain types shared across Verdant services

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of hourly entries in a single-day weather series
pub const HOURS_PER_DAY: usize = 24;

/// AQI upper bound of the US EPA scale
pub const AQI_MAX: i32 = 500;

/// A geographic coordinate (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validate that the coordinate is finite and within WGS84 bounds
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(Error::InvalidSample(format!(
                "non-finite coordinate ({}, {})",
                self.latitude, self.longitude
            )));
        }
        if self.latitude.abs() > 90.0 || self.longitude.abs() > 180.0 {
            return Err(Error::InvalidSample(format!(
                "coordinate out of range ({}, {})",
                self.latitude, self.longitude
            )));
        }
        Ok(())
    }
}

/// A raw location sample captured by the sensor collaborator
///
/// Immutable once created; owned by the sample store until a cycle drains it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Sample {
    /// Create a sample stamped with the current time
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// One day of hourly weather values, indexed by hour-of-day (0-23)
///
/// Each metric vector carries [`HOURS_PER_DAY`] entries; shorter vectors are
/// tolerated and read as absent past their end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherSeries {
    /// Air temperature at 2m, degrees Celsius
    pub temperature_c: Vec<f64>,
    /// Precipitation, millimeters
    pub precipitation_mm: Vec<f64>,
    /// Cloud cover, percent
    pub cloud_cover_pct: Vec<f64>,
    /// Wind speed at 10m, km/h
    pub wind_speed_kmh: Vec<f64>,
}

impl WeatherSeries {
    /// Temperature at the given hour-of-day, wrapping on hour >= 24
    pub fn temperature_at(&self, hour: u32) -> Option<f64> {
        self.temperature_c
            .get(hour as usize % HOURS_PER_DAY)
            .copied()
    }
}

/// Nearest green space returned by the places source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreenSpace {
    pub name: String,
    pub distance_meters: f64,
}

/// Joined environmental data for one coordinate
///
/// Each field is independently optional: an absent field means its source
/// failed or returned no data. The record remains valid and scorable with
/// per-term defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentalRecord {
    pub weather: Option<WeatherSeries>,
    pub air_quality_index: Option<i32>,
    pub nearest_green_space: Option<GreenSpace>,
    pub noise_level: Option<f64>,
}

impl EnvironmentalRecord {
    /// True when every source came back empty; such a record is not scorable
    pub fn is_empty(&self) -> bool {
        self.weather.is_none()
            && self.air_quality_index.is_none()
            && self.nearest_green_space.is_none()
            && self.noise_level.is_none()
    }
}

/// Per-term display values backing a composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// AQI term: aqi / 500, clamped to the scale's domain
    pub aqi: f32,
    /// Noise term: ambient dB / 10
    pub noise: f32,
    /// Temperature at the scoring hour, degrees Celsius (0 when absent)
    pub temperature: f32,
    /// Distance to the nearest green space in meters (0 when absent)
    pub green_space_distance: f32,
}

/// A geotagged, scored heatmap point
///
/// Immutable once created; appended to the heatmap index, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Composite Green Index score, clamped to [0, 1]
    pub score: f32,
    pub breakdown: ScoreBreakdown,
    pub scored_at: chrono::DateTime<chrono::Utc>,
}
