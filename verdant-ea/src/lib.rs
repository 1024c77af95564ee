//! # Verdant Environmental Aggregator (verdant-ea)
//!
//! Environmental data aggregation and scoring service.
//!
//! **Purpose:** Batch raw location samples from the sensor collaborator, and
//! once per cycle enrich one representative sample with weather, air quality,
//! nearest-green-space and ambient-noise data, score it, and publish it to the
//! heatmap index and the upload collaborator.
//!
//! **Architecture:** One periodic scheduler task drives the cycle; each cycle
//! fans out four concurrent source fetches and joins them at a fixed barrier
//! that tolerates partial source failure.

pub mod api;
pub mod fetch;
pub mod heatmap;
pub mod scheduler;
pub mod scoring;
pub mod state;
pub mod store;
pub mod upload;

pub use state::SharedState;
pub use verdant_common::{Error, Result};
