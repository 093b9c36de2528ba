use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use dl_core::ports::{BlobStorageError, BlobStoragePort};

/// Process-local storage. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryBlobStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed storage with an existing blob, e.g. a snapshot from an older build.
    pub fn with_blob(key: impl Into<String>, blob: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        storage.blobs().insert(key.into(), blob.into());
        storage
    }

    fn blobs(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlobStoragePort for InMemoryBlobStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStorageError> {
        Ok(self.blobs().get(key).cloned())
    }

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), BlobStorageError> {
        self.blobs().insert(key.to_string(), blob.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobStorageError> {
        self.blobs().remove(key);
        Ok(())
    }
}
