//! Air quality source client
//!
//! Queries an Open-Meteo compatible air-quality endpoint for the current
//! US EPA AQI at a coordinate.

use crate::fetch::{EnvironmentSource, SourceReading};
use serde::Deserialize;
use verdant_common::{Coordinate, Error, Result};

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: CurrentBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    /// Current US AQI; null when the model has no value for the location
    us_aqi: Option<f64>,
}

/// Air quality API client
pub struct AirQualityClient {
    http: reqwest::Client,
    base_url: String,
}

impl AirQualityClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }
}

fn source_error(reason: String) -> Error {
    Error::SourceError {
        source: "air_quality".to_string(),
        reason,
    }
}

#[async_trait::async_trait]
impl EnvironmentSource for AirQualityClient {
    fn name(&self) -> &'static str {
        "air_quality"
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<Option<SourceReading>> {
        let url = format!(
            "{}/v1/air-quality?latitude={}&longitude={}&current=us_aqi",
            self.base_url, coordinate.latitude, coordinate.longitude
        );

        tracing::debug!(url = %url, "Querying air quality API");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| source_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(source_error(format!("HTTP {}", status.as_u16())));
        }

        let payload: AirQualityResponse = response
            .json()
            .await
            .map_err(|e| source_error(format!("malformed payload: {}", e)))?;

        Ok(payload
            .current
            .us_aqi
            .map(|aqi| SourceReading::AirQuality(aqi.round() as i32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_parses() {
        let json = r#"{ "current": { "us_aqi": 42.0 } }"#;
        let payload: AirQualityResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.current.us_aqi, Some(42.0));
    }

    #[test]
    fn null_aqi_is_no_data() {
        let json = r#"{ "current": { "us_aqi": null } }"#;
        let payload: AirQualityResponse = serde_json::from_str(json).unwrap();
        assert!(payload.current.us_aqi.is_none());
    }
}
