//! Weather source client
//!
//! Queries an Open-Meteo compatible forecast endpoint for the current day's
//! hourly temperature, precipitation, cloud cover and wind speed.

use crate::fetch::{EnvironmentSource, SourceReading};
use serde::Deserialize;
use verdant_common::types::HOURS_PER_DAY;
use verdant_common::{Coordinate, Error, Result, WeatherSeries};

/// Hourly forecast response (Open-Meteo shape)
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct HourlyBlock {
    temperature_2m: Vec<f64>,
    precipitation: Vec<f64>,
    cloudcover: Vec<f64>,
    windspeed_10m: Vec<f64>,
}

/// Weather forecast API client
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    async fn fetch_forecast(&self, coordinate: Coordinate) -> Result<ForecastResponse> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}\
             &hourly=temperature_2m,precipitation,cloudcover,windspeed_10m\
             &forecast_days=1&timezone=auto",
            self.base_url, coordinate.latitude, coordinate.longitude
        );

        tracing::debug!(url = %url, "Querying weather API");

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

        response
            .json::<ForecastResponse>()
            .await
            .map_err(|e| source_error(format!("malformed payload: {}", e)))
    }
}

fn source_error(reason: String) -> Error {
    Error::SourceError {
        source: "weather".to_string(),
        reason,
    }
}

/// Cap a metric vector at one day of hourly entries
fn one_day(mut values: Vec<f64>) -> Vec<f64> {
    values.truncate(HOURS_PER_DAY);
    values
}

#[async_trait::async_trait]
impl EnvironmentSource for WeatherClient {
    fn name(&self) -> &'static str {
        "weather"
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<Option<SourceReading>> {
        let forecast = self.fetch_forecast(coordinate).await?;

        if forecast.hourly.temperature_2m.is_empty() {
            return Ok(None);
        }

        Ok(Some(SourceReading::Weather(WeatherSeries {
            temperature_c: one_day(forecast.hourly.temperature_2m),
            precipitation_mm: one_day(forecast.hourly.precipitation),
            cloud_cover_pct: one_day(forecast.hourly.cloudcover),
            wind_speed_kmh: one_day(forecast.hourly.windspeed_10m),
        })))
    }
}
