//! Cycle scheduler
//!
//! Drives the recurring aggregation cycle through an explicit state machine:
//! `Idle → Collecting → Aggregating → Publishing → Idle`, with `Stopped` as
//! the terminal state reached only on shutdown. A tick with an empty batch
//! returns straight to `Idle`; an aggregation failure abandons the cycle
//! (logged, not retried — the next tick starts fresh).
//!
//! `run_cycle` is public so tests and the diagnostics endpoint can single-step
//! the machine without the timer.

use crate::fetch::EnvironmentFetcher;
use crate::scoring;
use crate::state::SharedState;
use crate::upload::UploadClient;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use verdant_common::events::VerdantEvent;
use verdant_common::{Result, ScoredPoint};

/// Scheduler state machine positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchedulerState {
    Idle,
    Collecting,
    Aggregating,
    Publishing,
    Stopped,
}

/// Cycle execution context shared with the timer task
struct SchedulerInner {
    state: Arc<SharedState>,
    fetcher: Arc<EnvironmentFetcher>,
    uploader: Option<Arc<UploadClient>>,
}

/// Periodic driver for the aggregation cycle
pub struct CycleScheduler {
    inner: Arc<SchedulerInner>,
    period: Duration,
    /// Present while the timer task runs; sending on it cancels the timer
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

impl CycleScheduler {
    pub fn new(
        state: Arc<SharedState>,
        fetcher: Arc<EnvironmentFetcher>,
        uploader: Option<Arc<UploadClient>>,
        period: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                state,
                fetcher,
                uploader,
            }),
            period,
            shutdown: Mutex::new(None),
        }
    }

    /// Start the periodic timer task; a no-op when already running
    pub async fn start(&self) {
        let mut shutdown = self.shutdown.lock().await;
        if shutdown.is_some() {
            debug!("Scheduler already running, start ignored");
            return;
        }

        let (tx, mut rx) = watch::channel(false);
        *shutdown = Some(tx);
        drop(shutdown);

        let inner = Arc::clone(&self.inner);
        inner.state.set_scheduler_state(SchedulerState::Idle).await;
        inner
            .state
            .broadcast_event(VerdantEvent::SchedulerStateChanged {
                running: true,
                timestamp: chrono::Utc::now(),
            });
        info!("Cycle scheduler started, period {:?}", self.period);

        let period = self.period;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first tick completes immediately; consume it so the first
            // cycle fires one full period after start
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = inner.run_cycle().await {
                            warn!("Cycle abandoned: {}", e);
                        }
                    }
                    // stop() cancels the pending timer; an in-flight cycle
                    // above runs to completion, bounded by source timeouts
                    _ = rx.changed() => break,
                }
            }

            inner
                .state
                .set_scheduler_state(SchedulerState::Stopped)
                .await;
            info!("Cycle scheduler stopped");
        });
    }

    /// Cancel the pending timer; a no-op when already stopped
    pub async fn stop(&self) {
        let mut shutdown = self.shutdown.lock().await;
        match shutdown.take() {
            Some(tx) => {
                let _ = tx.send(true);
                self.inner
                    .state
                    .broadcast_event(VerdantEvent::SchedulerStateChanged {
                        running: false,
                        timestamp: chrono::Utc::now(),
                    });
            }
            None => debug!("Scheduler already stopped, stop ignored"),
        }
    }

    /// Whether the timer task is currently running
    pub async fn is_running(&self) -> bool {
        self.shutdown.lock().await.is_some()
    }

    /// Execute one full cycle
    ///
    /// Returns `Ok(None)` when the batch was empty (cycle skipped),
    /// `Ok(Some(point))` when a point was published, and the aggregation
    /// error when every source failed (no point, no heatmap mutation).
    pub async fn run_cycle(&self) -> Result<Option<ScoredPoint>> {
        self.inner.run_cycle().await
    }
}

impl SchedulerInner {
    async fn run_cycle(&self) -> Result<Option<ScoredPoint>> {
        self.state
            .set_scheduler_state(SchedulerState::Collecting)
            .await;

        let Some(drained) = self.state.store.drain_for_cycle().await else {
            debug!("Empty batch at cycle tick, skipping");
            self.state.broadcast_event(VerdantEvent::CycleSkipped {
                timestamp: chrono::Utc::now(),
            });
            self.state.set_scheduler_state(SchedulerState::Idle).await;
            return Ok(None);
        };

        let coordinate = drained.representative.coordinate();
        info!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            batch = drained.samples.len(),
            "Cycle aggregating"
        );
        self.state.broadcast_event(VerdantEvent::CycleStarted {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            timestamp: chrono::Utc::now(),
        });
        self.state
            .set_scheduler_state(SchedulerState::Aggregating)
            .await;

        let record = match self.fetcher.fetch(coordinate).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Aggregation failed, cycle abandoned: {}", e);
                self.state.broadcast_event(VerdantEvent::CycleFailed {
                    reason: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                self.state.set_scheduler_state(SchedulerState::Idle).await;
                return Err(e);
            }
        };

        self.state
            .set_scheduler_state(SchedulerState::Publishing)
            .await;

        let point = scoring::score_record(&record, scoring::current_hour(), coordinate);
        self.state.heatmap.append(point.clone()).await;
        self.state.set_latest_record(record.clone()).await;

        if let Some(uploader) = &self.uploader {
            // fire-and-forget: a failed upload is logged and the batch is
            // not restored (bounded-batch trade-off over durability)
            let uploader = Arc::clone(uploader);
            let state = Arc::clone(&self.state);
            let samples = drained.samples;
            tokio::spawn(async move {
                if let Err(e) = uploader.upload_cycle(&samples, &record).await {
                    warn!("Cycle upload failed, batch discarded: {}", e);
                    state.broadcast_event(VerdantEvent::UploadFailed {
                        reason: e.to_string(),
                        timestamp: chrono::Utc::now(),
                    });
                }
            });
        }

        info!(score = point.score, "Cycle published");
        self.state.broadcast_event(VerdantEvent::CyclePublished {
            point: point.clone(),
            timestamp: chrono::Utc::now(),
        });
        self.state.set_scheduler_state(SchedulerState::Idle).await;

        Ok(Some(point))
    }
}
