//! Upload collaborator client
//!
//! Ships each cycle's drained batch plus its environmental record to the
//! remote persistence collaborator. Delivery is fire-and-forget: failures
//! are logged and the batch is NOT restored to the sample store. Accepting
//! the loss of one cycle's data keeps batch growth bounded; retry policy,
//! if any, belongs to the collaborator.

use serde::Serialize;
use verdant_common::{EnvironmentalRecord, Error, Result, Sample};

/// One cycle's upload payload
#[derive(Debug, Serialize)]
struct CycleUpload<'a> {
    device_id: &'a str,
    uploaded_at: chrono::DateTime<chrono::Utc>,
    samples: &'a [Sample],
    record: &'a EnvironmentalRecord,
}

/// HTTP client for the upload collaborator
pub struct UploadClient {
    http: reqwest::Client,
    endpoint: String,
    device_id: String,
}

impl UploadClient {
    pub fn new(http: reqwest::Client, endpoint: String, device_id: String) -> Self {
        Self {
            http,
            endpoint,
            device_id,
        }
    }

    /// Upload one cycle's batch and record
    pub async fn upload_cycle(
        &self,
        samples: &[Sample],
        record: &EnvironmentalRecord,
    ) -> Result<()> {
        let payload = CycleUpload {
            device_id: &self.device_id,
            uploaded_at: chrono::Utc::now(),
            samples,
            record,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UploadFailed(format!("HTTP {}", status.as_u16())));
        }

        tracing::debug!(
            samples = samples.len(),
            endpoint = %self.endpoint,
            "Cycle uploaded"
        );
        Ok(())
    }
}
