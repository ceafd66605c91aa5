//! RESP2 protocol implementation
//!
//! This module handles parsing and encoding of the Redis Serialization Protocol (RESP2).
//! It knows nothing about commands or storage.

mod codec;
mod resp;
mod types;

pub use codec::{RespCodec, DEFAULT_MAX_FRAME_BYTES};
pub use resp::{RespEncoder, RespParser};
pub use types::{RespError, RespValue};
