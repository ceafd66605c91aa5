//! AOF writer
//!
//! Appends write requests to the log and keeps it synced according to the
//! configured policy.

use super::{replay_entries, AofConfig, AofReader, SyncPolicy};
use crate::interpreter::Interpreter;
use crate::persistence::{Persistence, PersistenceError};
use crate::protocol::{RespEncoder, RespValue};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Append-only log of write requests
pub struct AppendOnlyFile {
    path: PathBuf,
    /// `None` once the log has been closed
    file: Arc<Mutex<Option<File>>>,
    sync_policy: SyncPolicy,
    sync_task: Mutex<Option<JoinHandle<()>>>,
}

impl AppendOnlyFile {
    /// Open (or create) the log at `config.path`
    ///
    /// Under `SyncPolicy::Periodic` a background sync task is spawned on the
    /// current tokio runtime.
    pub fn open(config: &AofConfig) -> Result<Self, PersistenceError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(&config.path)?;
        let file = Arc::new(Mutex::new(Some(file)));

        let sync_task = match config.sync_policy {
            SyncPolicy::Periodic => {
                let handle = Handle::try_current().map_err(|_| PersistenceError::NoRuntime)?;
                Some(handle.spawn(periodic_sync(Arc::clone(&file), config.sync_interval())))
            }
            SyncPolicy::Always | SyncPolicy::Never => None,
        };

        info!(
            "AOF opened at {} (sync policy: {:?})",
            config.path.display(),
            config.sync_policy
        );

        Ok(AppendOnlyFile {
            path: config.path.clone(),
            file,
            sync_policy: config.sync_policy,
            sync_task: Mutex::new(sync_task),
        })
    }
}

impl Persistence for AppendOnlyFile {
    fn write(&self, value: &RespValue) -> Result<(), PersistenceError> {
        let bytes = RespEncoder::encode(value);

        let mut guard = self.file.lock();
        let file = guard.as_mut().ok_or(PersistenceError::Closed)?;
        let offset = file.metadata()?.len();
        if let Err(e) = file.write_all(&bytes) {
            truncate_partial_record(file, offset);
            return Err(e.into());
        }

        if self.sync_policy == SyncPolicy::Always {
            file.sync_all()?;
        }

        Ok(())
    }

    fn read(&self, interpreter: &Interpreter) -> Result<usize, PersistenceError> {
        // Writers wait until the replay is over
        let _guard = self.file.lock();

        let reader = AofReader::load(&self.path)?;
        debug!("Replaying {} bytes from {}", reader.size(), self.path.display());

        let entries = reader.parse_entries()?;
        Ok(replay_entries(interpreter, entries))
    }

    fn close(&self) -> Result<(), PersistenceError> {
        if let Some(task) = self.sync_task.lock().take() {
            task.abort();
        }

        match self.file.lock().take() {
            Some(mut file) => {
                file.flush()?;
                file.sync_all()?;
                info!("AOF closed: {}", self.path.display());
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for AppendOnlyFile {
    fn drop(&mut self) {
        if let Some(task) = self.sync_task.get_mut().take() {
            task.abort();
        }
    }
}

/// Cut off a record that was only partly appended
///
/// Later appends must not land behind a torn record, or the log could no
/// longer be replayed.
fn truncate_partial_record(file: &File, offset: u64) {
    match file.set_len(offset) {
        Ok(()) => warn!("Discarded partial AOF record at offset {}", offset),
        Err(e) => error!("Failed to discard partial AOF record at offset {}: {}", offset, e),
    }
}

async fn periodic_sync(file: Arc<Mutex<Option<File>>>, period: std::time::Duration) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let file = Arc::clone(&file);
        let result = tokio::task::spawn_blocking(move || -> io::Result<bool> {
            match file.lock().as_ref() {
                Some(file) => file.sync_all().map(|_| true),
                None => Ok(false),
            }
        })
        .await;

        match result {
            Ok(Ok(true)) => debug!("AOF synced in background"),
            Ok(Ok(false)) => break,
            Ok(Err(e)) => error!("AOF background sync failed: {}", e),
            Err(e) => error!("AOF background sync task failed: {}", e),
        }
    }
}
