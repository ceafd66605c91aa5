//! AOF replay
//!
//! Rebuilds the store by running every logged request through the
//! interpreter.

use crate::interpreter::{Interpreter, Request};
use crate::protocol::RespValue;
use tracing::{info, warn};

/// Replay AOF entries into the interpreter's store
///
/// Entries that are not requests, or whose execution produces an error, are
/// skipped with a warning. Returns the number of entries applied.
pub fn replay_entries(interpreter: &Interpreter, entries: Vec<RespValue>) -> usize {
    let mut replayed = 0;

    for (index, entry) in entries.iter().enumerate() {
        let request = match Request::from_value(entry) {
            Ok(request) => request,
            Err(e) => {
                warn!("Skipping AOF entry {}: {}", index, e);
                continue;
            }
        };

        match interpreter.execute(&request) {
            RespValue::Error(e) => warn!("Failed to replay AOF entry {}: {}. Skipping.", index, e),
            _ => replayed += 1,
        }
    }

    info!("Successfully replayed {} AOF entries", replayed);
    replayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn log() -> Vec<RespValue> {
        vec![
            RespValue::command(["SET", "foo", "bar"]),
            RespValue::command(["HSET", "user", "name", "ada"]),
            RespValue::command(["SET", "foo", "baz"]),
            RespValue::command(["HSET", "user", "lang", "en"]),
        ]
    }

    #[test]
    fn test_replay_rebuilds_state() {
        let interpreter = Interpreter::new();

        assert_eq!(replay_entries(&interpreter, log()), 4);
        assert_eq!(interpreter.store().strings().get(b"foo"), Some(Bytes::from("baz")));
        assert_eq!(
            interpreter.store().hashes().get(b"user", b"lang"),
            Some(Bytes::from("en"))
        );
    }

    #[test]
    fn test_replay_is_deterministic() {
        let first = Interpreter::new();
        let second = Interpreter::new();
        replay_entries(&first, log());
        replay_entries(&second, log());

        assert_eq!(first.store().strings().snapshot(), second.store().strings().snapshot());
        assert_eq!(first.store().hashes().snapshot(), second.store().hashes().snapshot());
    }

    #[test]
    fn test_replay_skips_bad_entries() {
        let interpreter = Interpreter::new();
        let entries = vec![
            RespValue::simple_string("OK"),
            RespValue::command(["SET", "only-key"]),
            RespValue::command(["NOPE"]),
            RespValue::array(vec![]),
            RespValue::command(["SET", "k", "v"]),
        ];

        assert_eq!(replay_entries(&interpreter, entries), 1);
        assert_eq!(interpreter.store().strings().len(), 1);
        assert_eq!(interpreter.store().strings().get(b"k"), Some(Bytes::from("v")));
    }
}
