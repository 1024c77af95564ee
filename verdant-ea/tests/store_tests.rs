//! Sample store concurrency tests
//!
//! Drain-vs-record races are serialized by the store: no sample may be lost
//! or duplicated across a drain boundary.

use std::sync::Arc;
use verdant_ea::store::SampleStore;
use verdant_common::Sample;

/// Tag samples by longitude so we can account for every one of them
fn tagged(id: usize) -> Sample {
    Sample::new(10.0, id as f64)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_records_survive_a_drain() {
    let store = Arc::new(SampleStore::new());

    // pre-fill so the drain has work to do
    for i in 0..10 {
        store.record(tagged(i)).await.unwrap();
    }

    let drainer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.drain_for_cycle().await })
    };
    let writer_a = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.record(tagged(100)).await })
    };
    let writer_b = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.record(tagged(101)).await })
    };

    let drained = drainer.await.unwrap().expect("batch was non-empty");
    writer_a.await.unwrap().unwrap();
    writer_b.await.unwrap().unwrap();

    // whatever landed before the drain came out with it; everything else is
    // still in the store for the next cycle
    let second = store.drain_for_cycle().await;
    let leftover = second.as_ref().map(|d| d.samples.len()).unwrap_or(0);
    assert_eq!(drained.samples.len() + leftover, 12);

    // both racing records are accounted for exactly once
    let mut seen: Vec<f64> = drained
        .samples
        .iter()
        .chain(second.iter().flat_map(|d| d.samples.iter()))
        .map(|s| s.longitude)
        .collect();
    seen.sort_by(f64::total_cmp);
    seen.dedup();
    assert_eq!(seen.len(), 12);
    assert!(seen.contains(&100.0));
    assert!(seen.contains(&101.0));

    assert_eq!(store.total_recorded().await, 12);
    assert_eq!(store.len().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_writers_never_lose_samples() {
    let store = Arc::new(SampleStore::new());
    let mut handles = Vec::new();

    for i in 0..50 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.record(tagged(i)).await.unwrap();
        }));
    }
    // interleave a few drains with the writers
    let mut drained_total = 0usize;
    for _ in 0..5 {
        if let Some(drained) = store.drain_for_cycle().await {
            drained_total += drained.samples.len();
        }
        tokio::task::yield_now().await;
    }

    for handle in handles {
        handle.await.unwrap();
    }
    if let Some(drained) = store.drain_for_cycle().await {
        drained_total += drained.samples.len();
    }

    assert_eq!(drained_total, 50);
    assert_eq!(store.total_recorded().await, 50);
}
