use std::sync::Arc;

use crate::record::SubmissionResult;

use super::{KeyValueStore, StoreError};

/// Key holding the most recently submitted record.
pub const USER_DATA_KEY: &str = "userData";

/// Persists the latest [`SubmissionResult`] for the report page.
#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn KeyValueStore>,
}

impl RecordStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Serialize `record` as JSON and overwrite the stored one.
    pub fn save(&self, record: &SubmissionResult) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(record)?;
        self.store.set(USER_DATA_KEY, &bytes)?;
        tracing::debug!(key = USER_DATA_KEY, bytes = bytes.len(), "record saved");
        Ok(())
    }

    /// The stored record, or `None` when it is missing, unreadable, not a
    /// JSON object, or an empty object.
    pub fn load(&self) -> Option<SubmissionResult> {
        let bytes = match self.store.get(USER_DATA_KEY) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored record");
                return None;
            }
        };
        match serde_json::from_slice::<SubmissionResult>(&bytes) {
            Ok(record) if record.is_empty() => None,
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "stored record is malformed");
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(USER_DATA_KEY)
    }
}
