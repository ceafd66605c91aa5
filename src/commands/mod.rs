//! Command execution module
//!
//! Provides a unified interface for all commands through the Command trait.
//! Each command family is implemented in a separate file.

mod registry;

mod admin;
mod hash;
mod string;

pub use registry::CommandRegistry;

use crate::protocol::RespValue;
use crate::store::Store;
use bytes::Bytes;

/// Command execution trait
///
/// All commands implement this trait with a single execute method.
/// Argument counts are checked by the interpreter against `min_args`/`max_args`
/// before `execute` is called.
pub trait Command: Send + Sync {
    /// Execute the command against the store
    ///
    /// `args` excludes the command name itself.
    fn execute(&self, store: &Store, args: &[RespValue]) -> RespValue;

    /// Get the command name (for lookup and error messages)
    fn name(&self) -> &'static str;

    /// Get the minimum number of arguments required
    fn min_args(&self) -> usize {
        0
    }

    /// Get the maximum number of arguments (None = unlimited)
    fn max_args(&self) -> Option<usize> {
        None
    }

    /// Whether the command mutates the store and must be logged for replay
    fn is_write(&self) -> bool {
        false
    }
}

/// Helper function to extract a string argument as bytes
pub(crate) fn extract_bulk_string(value: &RespValue) -> Result<Bytes, &'static str> {
    match value {
        RespValue::BulkString(bytes) => Ok(bytes.clone()),
        RespValue::SimpleString(s) => Ok(Bytes::copy_from_slice(s.as_bytes())),
        _ => Err("expected bulk string argument"),
    }
}

/// Extract every argument, or produce the error response for the first bad one
pub(crate) fn extract_args<const N: usize>(args: &[RespValue]) -> Result<[Bytes; N], RespValue> {
    if args.len() != N {
        return Err(RespValue::error("ERR wrong number of arguments"));
    }

    let mut out: [Bytes; N] = std::array::from_fn(|_| Bytes::new());
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = extract_bulk_string(arg).map_err(|e| RespValue::error(format!("ERR {}", e)))?;
    }
    Ok(out)
}
