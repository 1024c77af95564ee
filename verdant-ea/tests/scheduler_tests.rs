//! Cycle scheduler state-machine tests
//!
//! Single-steps the scheduler with stubbed sources: skip on empty batch,
//! publish on success, abandon on total source failure, and idempotent
//! start/stop.

mod helpers;

use helpers::{all_ok_sources, StubBehavior, StubSource};
use std::sync::Arc;
use std::time::Duration;
use verdant_common::events::VerdantEvent;
use verdant_common::{Error, Sample};
use verdant_ea::fetch::{EnvironmentFetcher, EnvironmentSource};
use verdant_ea::scheduler::{CycleScheduler, SchedulerState};
use verdant_ea::state::SharedState;

fn scheduler_with(
    sources: Vec<Arc<dyn EnvironmentSource>>,
) -> (Arc<SharedState>, Arc<CycleScheduler>) {
    let state = Arc::new(SharedState::new());
    let fetcher = Arc::new(EnvironmentFetcher::new(sources, Duration::from_secs(10)));
    let scheduler = Arc::new(CycleScheduler::new(
        Arc::clone(&state),
        fetcher,
        None,
        Duration::from_secs(30),
    ));
    (state, scheduler)
}

fn all_failing_sources() -> Vec<Arc<dyn EnvironmentSource>> {
    vec![
        Arc::new(StubSource::new("weather", StubBehavior::Fail)),
        Arc::new(StubSource::new("air_quality", StubBehavior::Fail)),
        Arc::new(StubSource::new("places", StubBehavior::Fail)),
        Arc::new(StubSource::new("noise", StubBehavior::Fail)),
    ]
}

#[tokio::test]
async fn empty_batch_skips_cycle() {
    let (state, scheduler) = scheduler_with(all_ok_sources());
    let mut events = state.subscribe_events();

    let result = scheduler.run_cycle().await.unwrap();

    assert!(result.is_none());
    assert_eq!(state.scheduler_state().await, SchedulerState::Idle);
    assert!(state.heatmap.is_empty().await);

    let event = events.recv().await.unwrap();
    assert_eq!(event.event_name(), "CycleSkipped");
}

#[tokio::test]
async fn successful_cycle_publishes_point() {
    let (state, scheduler) = scheduler_with(all_ok_sources());

    state.store.record(Sample::new(47.37, 8.54)).await.unwrap();
    state.store.record(Sample::new(47.38, 8.55)).await.unwrap();

    let mut events = state.subscribe_events();
    let point = scheduler.run_cycle().await.unwrap().unwrap();

    assert!((0.0..=1.0).contains(&point.score));
    assert_eq!(state.scheduler_state().await, SchedulerState::Idle);
    assert_eq!(state.heatmap.len().await, 1);
    // batch was cleared by the drain
    assert_eq!(state.store.len().await, 0);
    // the record backing the point is available for display
    let record = state.latest_record().await.unwrap();
    assert_eq!(record.air_quality_index, Some(42));

    // CycleStarted then CyclePublished
    let first = events.recv().await.unwrap();
    assert_eq!(first.event_name(), "CycleStarted");
    let second = events.recv().await.unwrap();
    match second {
        VerdantEvent::CyclePublished { point: published, .. } => {
            assert_eq!(published.score, point.score);
        }
        other => panic!("expected CyclePublished, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_aggregation_abandons_cycle() {
    let (state, scheduler) = scheduler_with(all_failing_sources());

    state.store.record(Sample::new(47.37, 8.54)).await.unwrap();

    let result = scheduler.run_cycle().await;
    assert!(matches!(result, Err(Error::AggregationFailed)));

    // no point published, no heatmap mutation, back to Idle
    assert!(state.heatmap.is_empty().await);
    assert!(state.latest_record().await.is_none());
    assert_eq!(state.scheduler_state().await, SchedulerState::Idle);

    // the batch was consumed; the next tick starts fresh
    assert_eq!(state.store.len().await, 0);
}

#[tokio::test]
async fn next_cycle_recovers_after_failure() {
    let (state, scheduler) = scheduler_with(all_failing_sources());
    state.store.record(Sample::new(47.37, 8.54)).await.unwrap();
    assert!(scheduler.run_cycle().await.is_err());

    // same store, healthy sources now
    let fetcher = Arc::new(EnvironmentFetcher::new(
        all_ok_sources(),
        Duration::from_secs(10),
    ));
    let healthy = Arc::new(CycleScheduler::new(
        Arc::clone(&state),
        fetcher,
        None,
        Duration::from_secs(30),
    ));

    state.store.record(Sample::new(47.40, 8.50)).await.unwrap();
    let point = healthy.run_cycle().await.unwrap().unwrap();
    assert_eq!(state.heatmap.len().await, 1);
    assert_eq!(point.latitude, 47.40);
}

#[tokio::test]
async fn start_and_stop_are_idempotent() {
    let (state, scheduler) = scheduler_with(all_ok_sources());

    assert!(!scheduler.is_running().await);

    scheduler.start().await;
    assert!(scheduler.is_running().await);
    assert_eq!(state.scheduler_state().await, SchedulerState::Idle);

    // second start is a no-op
    scheduler.start().await;
    assert!(scheduler.is_running().await);

    scheduler.stop().await;
    assert!(!scheduler.is_running().await);

    // second stop is a no-op
    scheduler.stop().await;
    assert!(!scheduler.is_running().await);

    // a stopped scheduler can be started again
    scheduler.start().await;
    assert!(scheduler.is_running().await);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn periodic_timer_drives_cycles() {
    let state = Arc::new(SharedState::new());
    let fetcher = Arc::new(EnvironmentFetcher::new(
        all_ok_sources(),
        Duration::from_secs(10),
    ));
    let scheduler = Arc::new(CycleScheduler::new(
        Arc::clone(&state),
        fetcher,
        None,
        Duration::from_secs(30),
    ));

    state.store.record(Sample::new(47.37, 8.54)).await.unwrap();
    scheduler.start().await;

    // just shy of one period: nothing yet
    tokio::time::sleep(Duration::from_secs(29)).await;
    assert!(state.heatmap.is_empty().await);

    // past the first tick: one point published
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(state.heatmap.len().await, 1);

    // batch is empty now, the next tick skips without error
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(state.heatmap.len().await, 1);

    scheduler.stop().await;
}
