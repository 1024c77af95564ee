//! Concurrent environment fetching
//!
//! Given a coordinate, queries the four environment sources concurrently and
//! joins their results into one [`EnvironmentalRecord`]. The join is a fixed
//! fan-in barrier: it waits for all four sub-fetches to settle (value, error,
//! or timeout), with no ordering among them. A single failing or slow source
//! degrades only its own field; the join fails only when every source failed.

pub mod air_quality;
pub mod noise;
pub mod places;
pub mod weather;

use crate::fetch::air_quality::AirQualityClient;
use crate::fetch::noise::{NoiseLevelAccessor, NoiseSource};
use crate::fetch::places::PlacesClient;
use crate::fetch::weather::WeatherClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use verdant_common::config::VerdantConfig;
use verdant_common::{Coordinate, EnvironmentalRecord, Error, GreenSpace, Result, WeatherSeries};

const USER_AGENT: &str = "verdant/0.1.0 (environmental aggregation service)";

/// One source's contribution to an environmental record
#[derive(Debug, Clone)]
pub enum SourceReading {
    Weather(WeatherSeries),
    AirQuality(i32),
    GreenSpace(GreenSpace),
    Noise(f64),
}

/// An independently queryable environment source
///
/// All four sources implement this trait for uniform concurrent execution;
/// tests substitute stubs. `Ok(None)` means the source answered but had no
/// data for the coordinate (e.g. no park within the search radius); the
/// resulting field is absent either way.
#[async_trait::async_trait]
pub trait EnvironmentSource: Send + Sync {
    /// Source name for logging and error provenance
    fn name(&self) -> &'static str;

    /// Fetch this source's reading for the coordinate
    async fn fetch(&self, coordinate: Coordinate) -> Result<Option<SourceReading>>;
}

/// Fan-out/fan-in fetcher over the four environment sources
pub struct EnvironmentFetcher {
    sources: Vec<Arc<dyn EnvironmentSource>>,
    source_timeout: Duration,
}

impl EnvironmentFetcher {
    /// Build a fetcher over an explicit source set (tests use stubs here)
    pub fn new(sources: Vec<Arc<dyn EnvironmentSource>>, source_timeout: Duration) -> Self {
        Self {
            sources,
            source_timeout,
        }
    }

    /// Build the production fetcher: weather, air quality, places, noise
    pub fn with_default_sources(
        config: &VerdantConfig,
        noise: Arc<dyn NoiseLevelAccessor>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.source_timeout())
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        let sources: Vec<Arc<dyn EnvironmentSource>> = vec![
            Arc::new(WeatherClient::new(
                http.clone(),
                config.sources.weather_url.clone(),
            )),
            Arc::new(AirQualityClient::new(
                http.clone(),
                config.sources.air_quality_url.clone(),
            )),
            Arc::new(PlacesClient::new(
                http,
                config.sources.places_url.clone(),
                config.places_radius_meters,
            )),
            Arc::new(NoiseSource::new(noise)),
        ];

        Ok(Self::new(sources, config.source_timeout()))
    }

    /// Query all sources concurrently and join into one record
    ///
    /// Pure transformation of coordinate to record; the only side effects are
    /// the network calls themselves. Returns [`Error::AggregationFailed`]
    /// when every source failed or came back empty.
    pub async fn fetch(&self, coordinate: Coordinate) -> Result<EnvironmentalRecord> {
        let mut handles = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let source = Arc::clone(source);
            let deadline = self.source_timeout;
            handles.push(tokio::spawn(async move {
                let name = source.name();
                match tokio::time::timeout(deadline, source.fetch(coordinate)).await {
                    Ok(result) => (name, result),
                    Err(_) => (name, Err(Error::SourceTimeout(name.to_string()))),
                }
            }));
        }

        // Fan-in barrier: every sub-fetch settles before we proceed
        let mut record = EnvironmentalRecord::default();
        for handle in handles {
            let (name, result) = match handle.await {
                Ok(settled) => settled,
                Err(e) => {
                    warn!("Source task panicked: {}", e);
                    continue;
                }
            };

            match result {
                Ok(Some(reading)) => apply_reading(&mut record, reading),
                Ok(None) => debug!(source = name, "Source returned no data"),
                Err(e) => warn!(source = name, "Source failed: {}", e),
            }
        }

        if record.is_empty() {
            return Err(Error::AggregationFailed);
        }

        Ok(record)
    }
}

fn apply_reading(record: &mut EnvironmentalRecord, reading: SourceReading) {
    match reading {
        SourceReading::Weather(series) => record.weather = Some(series),
        SourceReading::AirQuality(aqi) => record.air_quality_index = Some(aqi),
        SourceReading::GreenSpace(space) => record.nearest_green_space = Some(space),
        SourceReading::Noise(level) => record.noise_level = Some(level),
    }
}
