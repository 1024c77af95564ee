//! Sample batching store
//!
//! Holds the current batch of raw location samples in memory. Append-only
//! until a cycle drains it; drain picks one representative uniformly at
//! random and clears the whole batch in the same critical section, so
//! records racing a drain land cleanly in the next batch.

use rand::Rng;
use tokio::sync::Mutex;
use verdant_common::{Result, Sample};

/// Batch contents guarded by the store's mutex
#[derive(Debug, Default)]
struct Batch {
    samples: Vec<Sample>,
    /// Monotonically growing count of accepted samples; never reset by drains
    total_recorded: u64,
}

/// Result of draining the store for one aggregation cycle
#[derive(Debug)]
pub struct DrainedBatch {
    /// The sample chosen to drive external enrichment this cycle
    pub representative: Sample,
    /// The full batch, handed to the upload collaborator
    pub samples: Vec<Sample>,
}

/// In-memory store for the current sample batch
pub struct SampleStore {
    batch: Mutex<Batch>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self {
            batch: Mutex::new(Batch::default()),
        }
    }

    /// Append a sample to the current batch
    ///
    /// Rejects non-finite or out-of-range coordinates with
    /// [`verdant_common::Error::InvalidSample`]; nothing is stored on
    /// rejection. Returns the batch length after the append.
    pub async fn record(&self, sample: Sample) -> Result<usize> {
        sample.coordinate().validate()?;

        let mut batch = self.batch.lock().await;
        batch.samples.push(sample);
        batch.total_recorded += 1;
        Ok(batch.samples.len())
    }

    /// Drain the batch for one cycle
    ///
    /// Returns `None` on an empty batch (a legitimate skip state, not an
    /// error). Otherwise picks one sample uniformly at random and clears the
    /// entire batch as a side effect, regardless of which sample was chosen.
    /// Uniform selection avoids bias toward the most recent location and
    /// amortizes external-API cost across many raw samples.
    pub async fn drain_for_cycle(&self) -> Option<DrainedBatch> {
        let mut batch = self.batch.lock().await;
        if batch.samples.is_empty() {
            return None;
        }

        let index = rand::thread_rng().gen_range(0..batch.samples.len());
        let samples = std::mem::take(&mut batch.samples);
        let representative = samples[index].clone();

        Some(DrainedBatch {
            representative,
            samples,
        })
    }

    /// Number of samples in the current batch
    pub async fn len(&self) -> usize {
        self.batch.lock().await.samples.len()
    }

    /// Total samples accepted since startup (survives drains)
    pub async fn total_recorded(&self) -> u64 {
        self.batch.lock().await.total_recorded
    }
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new()
    }
}
