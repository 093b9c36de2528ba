//! Write-behind storage wrapper.
//!
//! `set` and `remove` record the value in an in-memory overlay and queue the
//! write for a background task, so the caller never waits on the durable
//! medium. Reads consult the overlay first. Failed writes are logged and
//! dropped; the next write for the same key replaces them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use dl_core::ports::{BlobStorageError, BlobStoragePort};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum FlushCommand {
    Set { key: String, blob: Vec<u8> },
    Remove { key: String },
    Barrier(oneshot::Sender<()>),
}

pub struct BackgroundFlushStorage {
    inner: Arc<dyn BlobStoragePort>,
    overlay: Mutex<HashMap<String, Option<Vec<u8>>>>,
    tx: mpsc::UnboundedSender<FlushCommand>,
}

impl BackgroundFlushStorage {
    /// Start the writer task on the current tokio runtime.
    pub fn spawn(inner: Arc<dyn BlobStoragePort>) -> anyhow::Result<Self> {
        let handle = Handle::try_current()
            .context("background flush storage needs a running tokio runtime")?;
        Ok(Self::spawn_on(&handle, inner))
    }

    pub fn spawn_on(handle: &Handle, inner: Arc<dyn BlobStoragePort>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run_writer(inner.clone(), rx));

        Self {
            inner,
            overlay: Mutex::new(HashMap::new()),
            tx,
        }
    }

    /// Wait until every write queued before this call reached the inner storage.
    pub async fn flush(&self) -> Result<(), BlobStorageError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(FlushCommand::Barrier(done_tx))
            .map_err(|_| BlobStorageError::ChannelClosed)?;
        done_rx.await.map_err(|_| BlobStorageError::ChannelClosed)
    }

    /// Blocking [`flush`](Self::flush) for synchronous callers.
    ///
    /// Panics when called from inside an async context.
    pub fn flush_blocking(&self) -> Result<(), BlobStorageError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.enqueue(FlushCommand::Barrier(done_tx))?;
        done_rx
            .blocking_recv()
            .map_err(|_| BlobStorageError::ChannelClosed)
    }

    fn overlay(&self) -> MutexGuard<'_, HashMap<String, Option<Vec<u8>>>> {
        self.overlay.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enqueue(&self, command: FlushCommand) -> Result<(), BlobStorageError> {
        self.tx
            .send(command)
            .map_err(|_| BlobStorageError::ChannelClosed)
    }
}

impl BlobStoragePort for BackgroundFlushStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobStorageError> {
        if let Some(pending) = self.overlay().get(key) {
            return Ok(pending.clone());
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, blob: &[u8]) -> Result<(), BlobStorageError> {
        self.overlay().insert(key.to_string(), Some(blob.to_vec()));
        self.enqueue(FlushCommand::Set {
            key: key.to_string(),
            blob: blob.to_vec(),
        })
    }

    fn remove(&self, key: &str) -> Result<(), BlobStorageError> {
        self.overlay().insert(key.to_string(), None);
        self.enqueue(FlushCommand::Remove {
            key: key.to_string(),
        })
    }
}

async fn run_writer(
    inner: Arc<dyn BlobStoragePort>,
    mut rx: mpsc::UnboundedReceiver<FlushCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            FlushCommand::Set { key, blob } => {
                let storage = inner.clone();
                let write_key = key.clone();
                let result =
                    tokio::task::spawn_blocking(move || storage.set(&write_key, &blob)).await;
                report(&key, "set", result);
            }
            FlushCommand::Remove { key } => {
                let storage = inner.clone();
                let remove_key = key.clone();
                let result = tokio::task::spawn_blocking(move || storage.remove(&remove_key)).await;
                report(&key, "remove", result);
            }
            FlushCommand::Barrier(done) => {
                let _ = done.send(());
            }
        }
    }

    debug!("Background flush writer stopped");
}

fn report(
    key: &str,
    op: &str,
    result: Result<Result<(), BlobStorageError>, tokio::task::JoinError>,
) {
    match result {
        Ok(Ok(())) => debug!(key, op, "Background write completed"),
        Ok(Err(e)) => warn!(key, op, error = %e, "Background write failed"),
        Err(e) => warn!(key, op, error = %e, "Background write task aborted"),
    }
}
