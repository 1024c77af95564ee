//! Ambient noise source
//!
//! The audio subsystem is an external collaborator: it pushes its current
//! ambient level over the HTTP surface, and cycles read the latest value
//! through the [`NoiseLevelAccessor`] seam.

use crate::fetch::{EnvironmentSource, SourceReading};
use std::sync::Arc;
use tokio::sync::RwLock;
use verdant_common::{Coordinate, Error, Result};

/// Accessor for the current ambient noise level in dB
#[async_trait::async_trait]
pub trait NoiseLevelAccessor: Send + Sync {
    async fn current(&self) -> Result<f64>;
}

/// Latest ambient level pushed by the sensor collaborator
pub struct SharedNoiseLevel {
    level_db: RwLock<Option<f64>>,
}

impl SharedNoiseLevel {
    pub fn new() -> Self {
        Self {
            level_db: RwLock::new(None),
        }
    }

    /// Record the most recent ambient level
    pub async fn set(&self, level_db: f64) {
        *self.level_db.write().await = Some(level_db);
    }
}

impl Default for SharedNoiseLevel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl NoiseLevelAccessor for SharedNoiseLevel {
    async fn current(&self) -> Result<f64> {
        self.level_db.read().await.ok_or_else(|| Error::SourceError {
            source: "noise".to_string(),
            reason: "no ambient reading received yet".to_string(),
        })
    }
}

/// Environment-source adapter over a noise accessor
pub struct NoiseSource {
    accessor: Arc<dyn NoiseLevelAccessor>,
}

impl NoiseSource {
    pub fn new(accessor: Arc<dyn NoiseLevelAccessor>) -> Self {
        Self { accessor }
    }
}

#[async_trait::async_trait]
impl EnvironmentSource for NoiseSource {
    fn name(&self) -> &'static str {
        "noise"
    }

    async fn fetch(&self, _coordinate: Coordinate) -> Result<Option<SourceReading>> {
        let level = self.accessor.current().await?;
        Ok(Some(SourceReading::Noise(level)))
    }
}
