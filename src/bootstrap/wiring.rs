//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create the storage adapter chain / 创建存储适配器链
//! - ✅ Create the snapshot codec / 创建快照编解码器
//! - ✅ Inject both into [`WizardStore`] / 注入到 WizardStore
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//!
//! This is the only place allowed to depend on dl-infra and dl-app together.

use std::path::PathBuf;
use std::sync::Arc;

use dl_app::{WizardStore, WizardStoreOptions, DEFAULT_STORAGE_KEY};
use dl_core::ports::{BlobStorageError, BlobStoragePort};
use dl_infra::{BackgroundFlushStorage, FileBlobStorage, JsonSnapshotCodec};
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{info, warn};

use super::config::{resolve_storage_dir, AppConfig};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Storage directory unavailable: {0}")]
    StorageDir(String),

    #[error("Failed to create storage directory {path}: {source}")]
    CreateStorageDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start background flush runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// The assembled store plus the handles needed to shut it down cleanly.
///
/// Dropping it outside an async context waits for queued writes first.
pub struct WiredStore {
    pub store: Arc<WizardStore>,
    pub storage_dir: PathBuf,
    background: Option<Arc<BackgroundFlushStorage>>,
    /// Runtime started for the writer task when none was running.
    runtime: Option<Runtime>,
}

impl WiredStore {
    /// Wait for queued writes. A no-op when writes are inline.
    pub async fn flush(&self) -> Result<(), BlobStorageError> {
        match &self.background {
            Some(background) => background.flush().await,
            None => Ok(()),
        }
    }

    /// [`flush`](Self::flush) for synchronous callers. Must not be called
    /// from inside an async context.
    pub fn flush_blocking(&self) -> Result<(), BlobStorageError> {
        match &self.background {
            Some(background) => background.flush_blocking(),
            None => Ok(()),
        }
    }
}

impl Drop for WiredStore {
    fn drop(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };
        if Handle::try_current().is_err() {
            if let Err(e) = self.flush_blocking() {
                warn!(error = %e, "Failed to flush queued wizard writes on shutdown");
            }
        }
        runtime.shutdown_background();
    }
}

/// Writer task host: the caller's runtime when there is one, else a small
/// runtime owned by the [`WiredStore`].
fn writer_runtime() -> WiringResult<(Handle, Option<Runtime>)> {
    if let Ok(handle) = Handle::try_current() {
        return Ok((handle, None));
    }

    let runtime = Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("dl-flush")
        .enable_all()
        .build()
        .map_err(WiringError::Runtime)?;
    Ok((runtime.handle().clone(), Some(runtime)))
}

/// Build the wizard store from configuration.
///
/// Writes go through a background writer unless `background_flush` is
/// explicitly `false`.
pub fn build_store(config: &AppConfig) -> WiringResult<WiredStore> {
    let storage_dir =
        resolve_storage_dir(config).map_err(|e| WiringError::StorageDir(e.to_string()))?;
    std::fs::create_dir_all(&storage_dir).map_err(|source| WiringError::CreateStorageDir {
        path: storage_dir.clone(),
        source,
    })?;

    let file: Arc<dyn BlobStoragePort> = Arc::new(FileBlobStorage::new(&storage_dir));

    let background_flush = config.background_flush.unwrap_or(true);
    let (storage, background, runtime) = if background_flush {
        let (handle, runtime) = writer_runtime()?;
        let background = Arc::new(BackgroundFlushStorage::spawn_on(&handle, file));
        (
            background.clone() as Arc<dyn BlobStoragePort>,
            Some(background),
            runtime,
        )
    } else {
        (file, None, None)
    };

    let storage_key = if config.storage_key.is_empty() {
        DEFAULT_STORAGE_KEY.to_string()
    } else {
        config.storage_key.clone()
    };

    info!(
        dir = %storage_dir.display(),
        key = %storage_key,
        background_flush,
        "Wiring wizard store"
    );

    let store = WizardStore::open(
        storage,
        Arc::new(JsonSnapshotCodec::new()),
        WizardStoreOptions {
            storage_key,
            ..Default::default()
        },
    );

    Ok(WiredStore {
        store: Arc::new(store),
        storage_dir,
        background,
        runtime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            storage_dir: dir.join("nested"),
            ..AppConfig::empty()
        }
    }

    #[test]
    fn test_build_store_creates_storage_dir() {
        let temp_dir = tempdir().unwrap();
        let wired = build_store(&config_in(temp_dir.path())).unwrap();

        assert!(wired.storage_dir.is_dir());
        assert_eq!(wired.store.storage_key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_build_store_uses_configured_key() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig {
            storage_key: "preview".to_string(),
            ..config_in(temp_dir.path())
        };

        let wired = build_store(&config).unwrap();
        wired.store.set_is_frozen(true);
        wired.flush_blocking().unwrap();

        assert!(wired.storage_dir.join("preview.json").is_file());
    }

    #[test]
    fn test_inline_writes_when_background_disabled() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig {
            background_flush: Some(false),
            ..config_in(temp_dir.path())
        };

        let wired = build_store(&config).unwrap();
        wired.store.set_is_frozen(true);

        assert!(wired.background.is_none());
        assert!(wired.storage_dir.join("diverlah-storage.json").is_file());
    }

    #[test]
    fn test_background_by_default_outside_runtime() {
        let temp_dir = tempdir().unwrap();
        let config = config_in(temp_dir.path());

        {
            let wired = build_store(&config).unwrap();
            assert!(wired.background.is_some());
            assert!(wired.runtime.is_some());
            wired.store.set_is_frozen(true);
        }

        // Dropping the wired store drained the queue.
        let restarted = build_store(&config).unwrap();
        assert!(restarted.store.is_frozen());
    }

    #[tokio::test]
    async fn test_background_uses_ambient_runtime() {
        let temp_dir = tempdir().unwrap();
        let wired = build_store(&config_in(temp_dir.path())).unwrap();
        assert!(wired.runtime.is_none());

        wired.store.set_is_frozen(true);
        wired.flush().await.unwrap();

        assert!(wired.storage_dir.join("diverlah-storage.json").is_file());
    }
}
