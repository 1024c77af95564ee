//! Append-only heatmap index
//!
//! Accumulates scored geographic points for the lifetime of the session.
//! The rendering collaborator pulls immutable snapshots; eviction and
//! persistence, if needed, belong to that collaborator.

use tokio::sync::RwLock;
use verdant_common::ScoredPoint;

/// Append-only collection of scored heatmap points
pub struct HeatmapIndex {
    points: RwLock<Vec<ScoredPoint>>,
}

impl HeatmapIndex {
    pub fn new() -> Self {
        Self {
            points: RwLock::new(Vec::new()),
        }
    }

    /// Append a scored point; O(1) amortized
    pub async fn append(&self, point: ScoredPoint) {
        self.points.write().await.push(point);
    }

    /// Immutable copy of all points for rendering
    ///
    /// Copy-on-read under a short read section; writers are never blocked
    /// beyond the bounded critical-section duration.
    pub async fn snapshot(&self) -> Vec<ScoredPoint> {
        self.points.read().await.clone()
    }

    /// Most recently published point, if any
    pub async fn latest(&self) -> Option<ScoredPoint> {
        self.points.read().await.last().cloned()
    }

    pub async fn len(&self) -> usize {
        self.points.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.points.read().await.is_empty()
    }
}

impl Default for HeatmapIndex {
    fn default() -> Self {
        Self::new()
    }
}
