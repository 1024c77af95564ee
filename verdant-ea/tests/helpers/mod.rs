//! Shared test helpers: stubbed environment sources

use std::time::Duration;
use verdant_common::{Coordinate, Error, GreenSpace, Result, WeatherSeries};
use verdant_ea::fetch::{EnvironmentSource, SourceReading};

/// What a stub source does when fetched
pub enum StubBehavior {
    /// Return this reading
    Reading(SourceReading),
    /// Answer successfully with no data
    Empty,
    /// Fail with a source error
    Fail,
    /// Never settle on its own (exercises the per-source timeout)
    Hang,
}

pub struct StubSource {
    name: &'static str,
    behavior: StubBehavior,
}

impl StubSource {
    pub fn new(name: &'static str, behavior: StubBehavior) -> Self {
        Self { name, behavior }
    }
}

#[async_trait::async_trait]
impl EnvironmentSource for StubSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _coordinate: Coordinate) -> Result<Option<SourceReading>> {
        match &self.behavior {
            StubBehavior::Reading(reading) => Ok(Some(reading.clone())),
            StubBehavior::Empty => Ok(None),
            StubBehavior::Fail => Err(Error::SourceError {
                source: self.name.to_string(),
                reason: "stub failure".to_string(),
            }),
            StubBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

/// A one-day weather series with a fixed temperature
pub fn flat_weather(temperature_c: f64) -> WeatherSeries {
    WeatherSeries {
        temperature_c: vec![temperature_c; 24],
        precipitation_mm: vec![0.0; 24],
        cloud_cover_pct: vec![50.0; 24],
        wind_speed_kmh: vec![10.0; 24],
    }
}

/// The four production-shaped sources, all succeeding
pub fn all_ok_sources() -> Vec<std::sync::Arc<dyn EnvironmentSource>> {
    vec![
        std::sync::Arc::new(StubSource::new(
            "weather",
            StubBehavior::Reading(SourceReading::Weather(flat_weather(18.0))),
        )),
        std::sync::Arc::new(StubSource::new(
            "air_quality",
            StubBehavior::Reading(SourceReading::AirQuality(42)),
        )),
        std::sync::Arc::new(StubSource::new(
            "places",
            StubBehavior::Reading(SourceReading::GreenSpace(GreenSpace {
                name: "Test Park".to_string(),
                distance_meters: 300.0,
            })),
        )),
        std::sync::Arc::new(StubSource::new(
            "noise",
            StubBehavior::Reading(SourceReading::Noise(30.0)),
        )),
    ]
}
