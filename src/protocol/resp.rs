//! RESP2 parser and encoder
//!
//! Implements parsing from bytes to RespValue and encoding from RespValue to bytes

use super::types::{RespError, RespValue};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use tracing::warn;

const CRLF: &[u8] = b"\r\n";

/// Upper bound on the capacity reserved up front for a declared array length
const MAX_PREALLOCATED_ELEMENTS: usize = 1024;

/// Deepest array nesting accepted; the parser recurses once per level
pub const MAX_NESTING_DEPTH: usize = 128;

/// RESP2 Parser
pub struct RespParser;

impl RespParser {
    /// Decode a single value from the start of `src`
    ///
    /// Returns the value and the number of bytes it occupied. Input that ends
    /// before the value is complete yields `RespError::Truncated`.
    pub fn decode(src: &[u8]) -> Result<(RespValue, usize), RespError> {
        let mut cursor = Cursor::new(src);
        let value = Self::parse_value(&mut cursor, 0)?;
        Ok((value, cursor.position() as usize))
    }

    /// Parse a RESP value from a buffer
    ///
    /// Returns Ok(Some(value)) if a complete value was parsed,
    /// Ok(None) if more data is needed,
    /// Err(e) if parsing failed
    pub fn parse(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        if buf.is_empty() {
            return Ok(None);
        }

        match Self::decode(&buf[..]) {
            Ok((value, consumed)) => {
                buf.advance(consumed);
                Ok(Some(value))
            }
            Err(RespError::Truncated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Decode values back to back until the input is exhausted
    ///
    /// Running out of input, even in the middle of a value, ends the pass
    /// cleanly: a torn last record is dropped. Any other decoding failure is
    /// returned.
    pub fn read_many(src: &[u8]) -> Result<Vec<RespValue>, RespError> {
        let mut values = Vec::new();
        let mut pos = 0;

        while pos < src.len() {
            match Self::decode(&src[pos..]) {
                Ok((value, consumed)) => {
                    values.push(value);
                    pos += consumed;
                }
                Err(RespError::Truncated) => {
                    warn!(
                        "Dropping {} trailing bytes of an incomplete value at offset {}",
                        src.len() - pos,
                        pos
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(values)
    }

    fn parse_value(src: &mut Cursor<&[u8]>, depth: usize) -> Result<RespValue, RespError> {
        if !src.has_remaining() {
            return Err(RespError::Truncated);
        }

        match src.get_u8() {
            b'+' => Self::parse_simple_string(src),
            b'-' => Self::parse_error(src),
            b':' => Self::parse_integer(src),
            b'$' => Self::parse_bulk_string(src),
            b'*' => Self::parse_array(src, depth),
            other => {
                warn!("Unsupported type prefix: {:?}", char::from(other));
                Err(RespError::UnsupportedType(other))
            }
        }
    }

    /// Parse simple string: +OK\r\n
    fn parse_simple_string(src: &mut Cursor<&[u8]>) -> Result<RespValue, RespError> {
        let line = Self::read_line(src)?;
        let s = String::from_utf8(line.to_vec()).map_err(|_| RespError::InvalidUtf8)?;
        Ok(RespValue::SimpleString(s))
    }

    /// Parse error: -Error message\r\n
    fn parse_error(src: &mut Cursor<&[u8]>) -> Result<RespValue, RespError> {
        let line = Self::read_line(src)?;
        let s = String::from_utf8(line.to_vec()).map_err(|_| RespError::InvalidUtf8)?;
        Ok(RespValue::Error(s))
    }

    /// Parse integer: :1000\r\n
    fn parse_integer(src: &mut Cursor<&[u8]>) -> Result<RespValue, RespError> {
        Ok(RespValue::Integer(Self::read_decimal(src)?))
    }

    /// Parse bulk string: $6\r\nfoobar\r\n or $-1\r\n (null)
    fn parse_bulk_string(src: &mut Cursor<&[u8]>) -> Result<RespValue, RespError> {
        let len = Self::read_decimal(src)?;
        if len < 0 {
            return Ok(RespValue::Null);
        }

        let len = usize::try_from(len).map_err(|_| RespError::InvalidInteger(len.to_string()))?;
        let start = src.position() as usize;
        let data = *src.get_ref();

        if data.len() < start + len + CRLF.len() {
            return Err(RespError::Truncated);
        }

        if &data[start + len..start + len + CRLF.len()] != CRLF {
            return Err(RespError::MissingCrlf);
        }

        src.set_position((start + len + CRLF.len()) as u64);
        Ok(RespValue::BulkString(Bytes::copy_from_slice(
            &data[start..start + len],
        )))
    }

    /// Parse array: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    fn parse_array(src: &mut Cursor<&[u8]>, depth: usize) -> Result<RespValue, RespError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(RespError::NestingTooDeep(MAX_NESTING_DEPTH));
        }

        let count = Self::read_decimal(src)?;
        if count < 0 {
            return Ok(RespValue::Null);
        }

        let count =
            usize::try_from(count).map_err(|_| RespError::InvalidInteger(count.to_string()))?;

        let mut elements = Vec::with_capacity(count.min(MAX_PREALLOCATED_ELEMENTS));
        for _ in 0..count {
            elements.push(Self::parse_value(src, depth + 1)?);
        }

        Ok(RespValue::Array(elements))
    }

    /// Read a line and parse it as a signed decimal number
    fn read_decimal(src: &mut Cursor<&[u8]>) -> Result<i64, RespError> {
        let line = Self::read_line(src)?;
        let s = std::str::from_utf8(line).map_err(|_| RespError::InvalidUtf8)?;
        s.parse::<i64>()
            .map_err(|_| RespError::InvalidInteger(s.to_string()))
    }

    /// Read up to the next CRLF, advance past it, return the line without CRLF
    fn read_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], RespError> {
        let start = src.position() as usize;
        let data: &'a [u8] = *src.get_ref();

        let end = data[start..]
            .windows(CRLF.len())
            .position(|window| window == CRLF)
            .map(|index| start + index)
            .ok_or(RespError::Truncated)?;

        src.set_position((end + CRLF.len()) as u64);
        Ok(&data[start..end])
    }
}

/// RESP2 Encoder
pub struct RespEncoder;

impl RespEncoder {
    /// Encode a RESP value to bytes
    pub fn encode(value: &RespValue) -> Bytes {
        let mut buf = BytesMut::new();
        Self::encode_to(&mut buf, value);
        buf.freeze()
    }

    /// Encode a RESP value into an existing buffer
    pub fn encode_to(buf: &mut BytesMut, value: &RespValue) {
        match value {
            RespValue::SimpleString(s) => {
                buf.put_u8(b'+');
                buf.put_slice(s.as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::Error(e) => {
                buf.put_u8(b'-');
                buf.put_slice(e.as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::Integer(i) => {
                buf.put_u8(b':');
                buf.put_slice(i.to_string().as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::BulkString(bytes) => {
                buf.put_u8(b'$');
                buf.put_slice(bytes.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                buf.put_slice(bytes);
                buf.put_slice(CRLF);
            }
            RespValue::Null => {
                buf.put_slice(b"$-1\r\n");
            }
            RespValue::Array(arr) => {
                buf.put_u8(b'*');
                buf.put_slice(arr.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                for elem in arr {
                    Self::encode_to(buf, elem);
                }
            }
        }
    }
}
