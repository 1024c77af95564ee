//! Green Index scoring
//!
//! Pure, deterministic transformation from a joined environmental record
//! (plus the current hour-of-day) to a scored heatmap point.
//!
//! The composite score is a **clamped sum** of per-factor terms, not a
//! weighted average. It saturates at 1.0 easily; the clamp is preserved for
//! compatibility with historical heatmap data. The green-space and
//! temperature terms are coarse presence signals rather than continuous
//! functions of distance/value; any change there alters score semantics and
//! needs product-owner review first.

use chrono::Timelike;
use verdant_common::types::AQI_MAX;
use verdant_common::{Coordinate, EnvironmentalRecord, ScoreBreakdown, ScoredPoint};

/// Compute a scored point from an environmental record
///
/// Term semantics:
/// - AQI term: `aqi / 500`, clamped to the scale's domain; absent AQI
///   contributes 0.
/// - Noise term: `noise_db / 10`, floored at 0; absent noise contributes 0.
/// - Green-space term: 0.5 when the record carries green-space data, 1.0
///   when absent. Total absence of data is penalized harder than a far-away
///   park.
/// - Temperature term: 1.0 when weather data is present, 0.2 when absent.
///   The hourly temperature itself only feeds the breakdown.
/// - Composite: `min(1.0, aqi + green + temperature + noise/10)`.
pub fn score_record(
    record: &EnvironmentalRecord,
    hour_of_day: u32,
    coordinate: Coordinate,
) -> ScoredPoint {
    let temperature = record
        .weather
        .as_ref()
        .and_then(|w| w.temperature_at(hour_of_day))
        .unwrap_or(0.0) as f32;

    let aqi_term = record
        .air_quality_index
        .map(|aqi| aqi.clamp(0, AQI_MAX) as f32 / AQI_MAX as f32)
        .unwrap_or(0.0);

    let noise_term = record
        .noise_level
        .map(|db| (db.max(0.0) / 10.0) as f32)
        .unwrap_or(0.0);

    let green_term: f32 = if record.nearest_green_space.is_some() {
        0.5
    } else {
        1.0
    };

    let temperature_term: f32 = if record.weather.is_some() { 1.0 } else { 0.2 };

    let score = (aqi_term + green_term + temperature_term + noise_term / 10.0).min(1.0);

    ScoredPoint {
        latitude: coordinate.latitude,
        longitude: coordinate.longitude,
        score,
        breakdown: ScoreBreakdown {
            aqi: aqi_term,
            noise: noise_term,
            temperature,
            green_space_distance: record
                .nearest_green_space
                .as_ref()
                .map(|g| g.distance_meters as f32)
                .unwrap_or(0.0),
        },
        scored_at: chrono::Utc::now(),
    }
}

/// Current hour-of-day used by scheduled cycles
pub fn current_hour() -> u32 {
    chrono::Utc::now().hour()
}
