use super::errors::BlobStorageError;

/// Durable key-value byte store.
///
/// Values are opaque blobs; the store never inspects them. Implementations
/// must survive process restarts unless documented otherwise.
pub trait BlobStoragePort: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStorageError>;

    /// Store `blob` under `key`, replacing any previous value.
    fn set(&self, key: &str, blob: &[u8]) -> Result<(), BlobStorageError>;

    /// Delete the blob under `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), BlobStorageError>;
}
