//! Single-slot admission gate serializing render jobs process-wide.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::cloud::CloudError;

/// At most one job holds the permit at a time; others wait in FIFO order.
#[derive(Clone)]
pub struct AdmissionGate {
    slot: Arc<Semaphore>,
}

/// Held for the whole scan+draw phase. Dropping it admits the next job.
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Waits until the slot is free.
    pub async fn acquire(&self) -> Result<AdmissionPermit, CloudError> {
        let permit = self
            .slot
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| CloudError::GateClosed)?;
        Ok(AdmissionPermit { _permit: permit })
    }

    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new()
    }
}
