//! Event types for the Verdant event system

use crate::types::ScoredPoint;
use serde::{Deserialize, Serialize};

/// Verdant event types, broadcast to SSE listeners and internal consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VerdantEvent {
    /// A raw sample was accepted into the current batch
    SampleRecorded {
        batch_len: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A scheduled cycle began aggregating
    CycleStarted {
        latitude: f64,
        longitude: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A cycle tick found an empty batch and was skipped
    CycleSkipped {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Every environment source failed; the cycle was abandoned
    CycleFailed {
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A cycle produced and published a new scored heatmap point
    CyclePublished {
        point: ScoredPoint,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Scheduler started or stopped
    SchedulerStateChanged {
        running: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Fire-and-forget upload of a cycle's batch failed (batch is not restored)
    UploadFailed {
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl VerdantEvent {
    /// Event name as sent in the SSE `event:` field
    pub fn event_name(&self) -> &'static str {
        match self {
            VerdantEvent::SampleRecorded { .. } => "SampleRecorded",
            VerdantEvent::CycleStarted { .. } => "CycleStarted",
            VerdantEvent::CycleSkipped { .. } => "CycleSkipped",
            VerdantEvent::CycleFailed { .. } => "CycleFailed",
            VerdantEvent::CyclePublished { .. } => "CyclePublished",
            VerdantEvent::SchedulerStateChanged { .. } => "SchedulerStateChanged",
            VerdantEvent::UploadFailed { .. } => "UploadFailed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = VerdantEvent::CycleSkipped {
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CycleSkipped");
    }

    #[test]
    fn event_names_match_variants() {
        let event = VerdantEvent::UploadFailed {
            reason: "connection refused".to_string(),
            timestamp: chrono::Utc::now(),
        };
        assert_eq!(event.event_name(), "UploadFailed");
    }
}
