//! RESP2 value types
//!
//! Defines the core data types for the RESP2 protocol

use bytes::Bytes;
use std::fmt;
use std::io;
use thiserror::Error;

/// RESP2 value types
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple strings: +OK\r\n
    SimpleString(String),

    /// Errors: -Error message\r\n
    Error(String),

    /// Integers: :1000\r\n
    Integer(i64),

    /// Bulk strings: $6\r\nfoobar\r\n
    BulkString(Bytes),

    /// Null bulk string: $-1\r\n
    Null,

    /// Arrays: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<RespValue>),
}

impl RespValue {
    pub fn simple_string(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    pub fn integer(i: i64) -> Self {
        RespValue::Integer(i)
    }

    pub fn bulk_string(b: impl Into<Bytes>) -> Self {
        RespValue::BulkString(b.into())
    }

    pub fn null() -> Self {
        RespValue::Null
    }

    pub fn array(v: Vec<RespValue>) -> Self {
        RespValue::Array(v)
    }

    /// Build a command request (array of bulk strings), as clients send them
    pub fn command<I, B>(parts: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        RespValue::Array(
            parts
                .into_iter()
                .map(|part| RespValue::BulkString(part.into()))
                .collect(),
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RespValue::Error(_))
    }

    /// Try to extract array elements
    pub fn as_array(&self) -> Option<&[RespValue]> {
        match self {
            RespValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Raw bytes of a string-like value.
    ///
    /// Both simple and bulk strings carry text; errors are a separate type and are
    /// not considered strings here.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RespValue::BulkString(bytes) => Some(bytes),
            RespValue::SimpleString(s) => Some(s.as_bytes()),
            _ => None,
        }
    }
}

impl fmt::Display for RespValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespValue::SimpleString(s) => write!(f, "SimpleString({})", s),
            RespValue::Error(e) => write!(f, "Error({})", e),
            RespValue::Integer(i) => write!(f, "Integer({})", i),
            RespValue::BulkString(b) => write!(f, "BulkString({} bytes)", b.len()),
            RespValue::Null => write!(f, "Null"),
            RespValue::Array(arr) => write!(f, "Array({} elements)", arr.len()),
        }
    }
}

/// RESP decoding errors
#[derive(Debug, Error)]
pub enum RespError {
    /// The input ended before a complete value was read
    #[error("truncated input")]
    Truncated,

    /// A type prefix outside the supported subset
    #[error("unsupported type prefix: {:?}", char::from(*.0))]
    UnsupportedType(u8),

    /// A length or integer line that is not a decimal number
    #[error("invalid integer: {0:?}")]
    InvalidInteger(String),

    #[error("invalid UTF-8")]
    InvalidUtf8,

    /// Bulk string payload not followed by CRLF
    #[error("missing CRLF after bulk string data")]
    MissingCrlf,

    /// Arrays nested past the parser's depth limit
    #[error("arrays nested deeper than {0} levels")]
    NestingTooDeep(usize),

    #[error("frame of {0} bytes exceeds the size limit")]
    FrameTooLarge(usize),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
