//! Durable key-value storage and the record bridge on top of it.
//!
//! The submit flow writes the server's record once, the report page reads it
//! back, possibly from a later process. Everything goes through the
//! [`KeyValueStore`] port so tests can swap in [`MemoryStore`].

mod file;
mod memory;
mod records;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use records::{RecordStore, USER_DATA_KEY};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access store at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Byte-oriented key-value port.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
