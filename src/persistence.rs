//! Persistence strategies
//!
//! The server talks to a `Persistence` trait object; the strategy is picked
//! from configuration at startup.

use crate::aof::AppendOnlyFile;
use crate::config::{Config, PersistenceKind};
use crate::interpreter::Interpreter;
use crate::protocol::{RespError, RespValue};
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupted log: {0}")]
    Corrupted(#[from] RespError),

    #[error("periodic sync needs a running tokio runtime")]
    NoRuntime,

    #[error("persistence is closed")]
    Closed,
}

/// Durable record of write requests
pub trait Persistence: Send + Sync {
    /// Record one write request, encoded as it arrived
    fn write(&self, value: &RespValue) -> Result<(), PersistenceError>;

    /// Replay everything recorded so far into `interpreter`
    ///
    /// Returns the number of requests applied.
    fn read(&self, interpreter: &Interpreter) -> Result<usize, PersistenceError>;

    /// Flush and release resources; later writes fail with `Closed`
    fn close(&self) -> Result<(), PersistenceError>;
}

/// No persistence: writes are discarded, nothing is replayed
#[derive(Debug, Default)]
pub struct Disabled;

impl Persistence for Disabled {
    fn write(&self, _value: &RespValue) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn read(&self, _interpreter: &Interpreter) -> Result<usize, PersistenceError> {
        Ok(0)
    }

    fn close(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Build the strategy selected by `config`
pub fn open(config: &Config) -> Result<Arc<dyn Persistence>, PersistenceError> {
    match config.persistence {
        PersistenceKind::Aof => Ok(Arc::new(AppendOnlyFile::open(&config.aof)?)),
        PersistenceKind::None => {
            info!("Persistence disabled");
            Ok(Arc::new(Disabled))
        }
    }
}
