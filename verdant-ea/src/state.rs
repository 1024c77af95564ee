//! Shared service state
//!
//! Thread-safe state shared between the HTTP surface, the cycle scheduler
//! and the sensor-facing endpoints.

use crate::fetch::noise::SharedNoiseLevel;
use crate::heatmap::HeatmapIndex;
use crate::scheduler::SchedulerState;
use crate::store::SampleStore;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use verdant_common::events::VerdantEvent;
use verdant_common::EnvironmentalRecord;

/// State accessible by all components
pub struct SharedState {
    /// Current batch of raw samples
    pub store: SampleStore,

    /// Append-only scored points for rendering
    pub heatmap: HeatmapIndex,

    /// Latest ambient noise level pushed by the sensor collaborator
    pub noise: Arc<SharedNoiseLevel>,

    /// Environmental record backing the most recent scored point
    latest_record: RwLock<Option<EnvironmentalRecord>>,

    /// Scheduler state machine position, readable by the status API
    scheduler_state: RwLock<SchedulerState>,

    /// Event broadcaster for SSE listeners
    event_tx: broadcast::Sender<VerdantEvent>,
}

impl SharedState {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            store: SampleStore::new(),
            heatmap: HeatmapIndex::new(),
            noise: Arc::new(SharedNoiseLevel::new()),
            latest_record: RwLock::new(None),
            scheduler_state: RwLock::new(SchedulerState::Stopped),
            event_tx,
        }
    }

    /// Broadcast an event to all SSE listeners
    pub fn broadcast_event(&self, event: VerdantEvent) {
        // No receivers is fine
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<VerdantEvent> {
        self.event_tx.subscribe()
    }

    pub async fn scheduler_state(&self) -> SchedulerState {
        *self.scheduler_state.read().await
    }

    pub async fn set_scheduler_state(&self, state: SchedulerState) {
        *self.scheduler_state.write().await = state;
    }

    pub async fn latest_record(&self) -> Option<EnvironmentalRecord> {
        self.latest_record.read().await.clone()
    }

    pub async fn set_latest_record(&self, record: EnvironmentalRecord) {
        *self.latest_record.write().await = Some(record);
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
