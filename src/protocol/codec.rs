//! Stream framing for RESP values

use super::resp::{RespEncoder, RespParser};
use super::types::{RespError, RespValue};
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

pub const DEFAULT_MAX_FRAME_BYTES: usize = 512 * 1024 * 1024;

/// Frames a byte stream into RESP values and back
#[derive(Debug, Clone)]
pub struct RespCodec {
    max_frame_bytes: usize,
}

impl RespCodec {
    pub fn new(max_frame_bytes: usize) -> Self {
        RespCodec { max_frame_bytes }
    }
}

impl Default for RespCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_BYTES)
    }
}

impl Decoder for RespCodec {
    type Item = RespValue;
    type Error = RespError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match RespParser::parse(src)? {
            Some(value) => Ok(Some(value)),
            // Not enough data yet; refuse to buffer without bound.
            None if src.len() > self.max_frame_bytes => Err(RespError::FrameTooLarge(src.len())),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(value) => Ok(Some(value)),
            None if src.is_empty() => Ok(None),
            None => Err(RespError::Truncated),
        }
    }
}

impl Encoder<RespValue> for RespCodec {
    type Error = RespError;

    fn encode(&mut self, item: RespValue, dst: &mut BytesMut) -> Result<(), Self::Error> {
        RespEncoder::encode_to(dst, &item);
        Ok(())
    }
}
