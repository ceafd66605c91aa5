//! Append-Only File (AOF) persistence module
//!
//! Provides durability by logging every successful write request to disk,
//! encoded exactly as it arrived on the wire (RESP arrays of bulk strings,
//! concatenated with no extra framing). On startup the file is replayed
//! through the interpreter.

mod reader;
mod replay;
mod writer;

pub use reader::AofReader;
pub use replay::replay_entries;
pub use writer::AppendOnlyFile;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// AOF sync policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SyncPolicy {
    /// Sync after every write (safest, slowest)
    Always,
    /// Sync from a background task on a fixed interval (balanced)
    #[default]
    Periodic,
    /// Let the OS decide when to sync (fastest, least safe)
    Never,
}

/// AOF configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AofConfig {
    /// Path to the AOF file, created if absent
    pub path: PathBuf,
    /// Sync policy
    pub sync_policy: SyncPolicy,
    /// Interval between background syncs under `SyncPolicy::Periodic`
    pub sync_interval_ms: u64,
}

impl AofConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AofConfig {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_sync_policy(mut self, sync_policy: SyncPolicy) -> Self {
        self.sync_policy = sync_policy;
        self
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms.max(1))
    }
}

impl Default for AofConfig {
    fn default() -> Self {
        AofConfig {
            path: PathBuf::from("./aof"),
            sync_policy: SyncPolicy::default(),
            sync_interval_ms: 1000,
        }
    }
}
