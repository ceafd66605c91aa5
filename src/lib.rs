//! respkv - A minimal RESP key-value server with append-only persistence
//!
//! The crate is split along single responsibilities:
//! - `protocol` decodes and encodes RESP values
//! - `store` holds string and hash keyspaces
//! - `commands` and `interpreter` turn requests into responses
//! - `aof` and `persistence` make writes durable and replay them at startup
//! - `server` accepts TCP clients

pub mod aof;
pub mod commands;
pub mod config;
pub mod interpreter;
pub mod persistence;
pub mod protocol;
pub mod server;
pub mod store;

/// Re-export commonly used types
pub use config::Config;
pub use interpreter::{Interpreter, Request};
pub use persistence::{Persistence, PersistenceError};
pub use protocol::{RespError, RespValue};
pub use server::Server;
pub use store::Store;
