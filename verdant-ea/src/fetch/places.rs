//! Green-space source client
//!
//! Searches an Overpass compatible endpoint for parks around a coordinate
//! and returns the nearest match by great-circle distance. No park within
//! the search radius is a none-found answer, not a source failure.

use crate::fetch::{EnvironmentSource, SourceReading};
use serde::Deserialize;
use std::collections::HashMap;
use verdant_common::{Coordinate, Error, GreenSpace, Result};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: f64,
    lon: f64,
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Places API client for nearest-green-space lookup
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    radius_meters: u32,
}

impl PlacesClient {
    pub fn new(http: reqwest::Client, base_url: String, radius_meters: u32) -> Self {
        Self {
            http,
            base_url,
            radius_meters,
        }
    }
}

fn source_error(reason: String) -> Error {
    Error::SourceError {
        source: "places".to_string(),
        reason,
    }
}

/// Great-circle distance between two coordinates in meters (haversine)
fn haversine_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[async_trait::async_trait]
impl EnvironmentSource for PlacesClient {
    fn name(&self) -> &'static str {
        "places"
    }

    async fn fetch(&self, coordinate: Coordinate) -> Result<Option<SourceReading>> {
        let query = format!(
            "[out:json][timeout:10];node[\"leisure\"=\"park\"](around:{},{},{});out body;",
            self.radius_meters, coordinate.latitude, coordinate.longitude
        );
        let url = format!("{}/api/interpreter", self.base_url);

        tracing::debug!(url = %url, radius = self.radius_meters, "Querying places API");

        let response = self
            .http
            .post(&url)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| source_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(source_error(format!("HTTP {}", status.as_u16())));
        }

        let payload: OverpassResponse = response
            .json()
            .await
            .map_err(|e| source_error(format!("malformed payload: {}", e)))?;

        let nearest = payload
            .elements
            .into_iter()
            .map(|element| {
                let distance =
                    haversine_meters(coordinate, Coordinate::new(element.lat, element.lon));
                (element, distance)
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b));

        Ok(nearest.map(|(element, distance_meters)| {
            let name = element
                .tags
                .get("name")
                .cloned()
                .unwrap_or_else(|| "Unnamed green space".to_string());
            SourceReading::GreenSpace(GreenSpace {
                name,
                distance_meters,
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_for_same_point() {
        let p = Coordinate::new(47.37, 8.54);
        assert!(haversine_meters(p, p) < 1e-6);
    }

    #[test]
    fn haversine_known_distance() {
        // one degree of latitude is about 111.2 km
        let a = Coordinate::new(47.0, 8.0);
        let b = Coordinate::new(48.0, 8.0);
        let d = haversine_meters(a, b);
        assert!((d - 111_195.0).abs() < 500.0, "got {}", d);
    }

    #[test]
    fn empty_elements_parse_as_none_found() {
        let json = r#"{ "elements": [] }"#;
        let payload: OverpassResponse = serde_json::from_str(json).unwrap();
        assert!(payload.elements.is_empty());
    }

    #[test]
    fn element_without_tags_parses() {
        let json = r#"{ "elements": [ { "lat": 47.4, "lon": 8.5 } ] }"#;
        let payload: OverpassResponse = serde_json::from_str(json).unwrap();
        assert!(payload.elements[0].tags.is_empty());
    }
}
