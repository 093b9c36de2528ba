use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dl_core::ports::{BlobStorageError, BlobStoragePort};
use tracing::{debug, warn};

/// Stores each key as `<dir>/<key>.json`.
pub struct FileBlobStorage {
    dir: PathBuf,
}

impl FileBlobStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    ///
    /// The key is percent-encoded, so distinct keys map to distinct files and
    /// no key can contain a path separator.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }

    /// Write to a sibling temp file and rename it over the target, so the
    /// target holds either the previous or the complete new contents.
    fn atomic_write(
        &self,
        key: &str,
        path: &Path,
        content: &[u8],
    ) -> Result<(), BlobStorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| BlobStorageError::io(key, e))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| BlobStorageError::io(key, e))?;

        // TODO: rename over an existing file is not atomic on every Windows filesystem.
        if let Err(e) = fs::rename(&tmp_path, path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                warn!(key, path = %tmp_path.display(), error = %cleanup, "Failed to remove temp file");
            }
            return Err(BlobStorageError::io(key, e));
        }

        Ok(())
    }
}

impl BlobStoragePort for FileBlobStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStorageError> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BlobStorageError::io(key, e)),
        }
    }

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), BlobStorageError> {
        let path = self.path_for(key);
        self.atomic_write(key, &path, blob)?;
        debug!(key, path = %path.display(), bytes = blob.len(), "Blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobStorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobStorageError::io(key, e)),
        }
    }
}
