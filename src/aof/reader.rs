//! AOF reader
//!
//! Loads the log into memory and decodes the requests it holds.

use crate::protocol::{RespError, RespParser, RespValue};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// AOF reader
pub struct AofReader {
    data: Vec<u8>,
}

impl AofReader {
    /// Load AOF file; a missing file reads as empty
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };

        Ok(AofReader { data })
    }

    /// Parse all entries from the AOF
    ///
    /// A request cut short at the end of the file (a torn final write) ends
    /// the log cleanly. Any other malformed data is an error.
    pub fn parse_entries(&self) -> Result<Vec<RespValue>, RespError> {
        let entries = RespParser::read_many(&self.data)?;
        info!("AOF loaded successfully: {} entries", entries.len());
        Ok(entries)
    }

    /// Get the total size of the AOF data
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reader.aof");
        fs::write(
            &path,
            b"*3\r\n$3\r\nSET\r\n$4\r\nkey1\r\n$6\r\nvalue1\r\n*3\r\n$3\r\nSET\r\n$4\r\nkey2\r\n$6\r\nvalue2\r\n",
        )
        .unwrap();

        let reader = AofReader::load(&path).unwrap();
        let entries = reader.parse_entries().unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], RespValue::command(["SET", "key1", "value1"]));
        assert_eq!(entries[1], RespValue::command(["SET", "key2", "value2"]));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let reader = AofReader::load(dir.path().join("absent.aof")).unwrap();

        assert_eq!(reader.size(), 0);
        assert!(reader.parse_entries().unwrap().is_empty());
    }

    #[test]
    fn test_torn_tail_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("torn.aof");
        fs::write(&path, b"*2\r\n$3\r\nGET\r\n$1\r\na\r\n*3\r\n$3\r\nSET\r\n$1\r\nb").unwrap();

        let entries = AofReader::load(&path).unwrap().parse_entries().unwrap();
        assert_eq!(entries, vec![RespValue::command(["GET", "a"])]);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.aof");
        fs::write(&path, b"hello world\r\n").unwrap();

        let result = AofReader::load(&path).unwrap().parse_entries();
        assert!(matches!(result, Err(RespError::UnsupportedType(b'h'))));
    }
}
