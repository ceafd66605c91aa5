//! Hash commands (HSET, HGET, HGETALL)

use super::{extract_args, Command};
use crate::protocol::RespValue;
use crate::store::Store;

/// HSET command - Set field in the hash stored at key to value
///
/// Syntax: HSET key field value
pub struct HSetCommand;

impl Command for HSetCommand {
    fn execute(&self, store: &Store, args: &[RespValue]) -> RespValue {
        let [key, field, value] = match extract_args::<3>(args) {
            Ok(parts) => parts,
            Err(e) => return e,
        };

        store.hashes().set(key, field, value);

        RespValue::simple_string("OK")
    }

    fn name(&self) -> &'static str {
        "HSET"
    }

    fn min_args(&self) -> usize {
        3
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }

    fn is_write(&self) -> bool {
        true
    }
}

/// HGET command - Get the value of a hash field
///
/// Syntax: HGET key field
pub struct HGetCommand;

impl Command for HGetCommand {
    fn execute(&self, store: &Store, args: &[RespValue]) -> RespValue {
        let [key, field] = match extract_args::<2>(args) {
            Ok(parts) => parts,
            Err(e) => return e,
        };

        match store.hashes().get(&key, &field) {
            Some(v) => RespValue::bulk_string(v),
            None => RespValue::null(),
        }
    }

    fn name(&self) -> &'static str {
        "HGET"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}

/// HGETALL command - Get all values in a hash
///
/// Syntax: HGETALL key
///
/// Only the values are returned, not the field names, in no particular order.
pub struct HGetAllCommand;

impl Command for HGetAllCommand {
    fn execute(&self, store: &Store, args: &[RespValue]) -> RespValue {
        let [key] = match extract_args::<1>(args) {
            Ok(parts) => parts,
            Err(e) => return e,
        };

        match store.hashes().get_all(&key) {
            Some(values) => {
                RespValue::array(values.into_iter().map(RespValue::BulkString).collect())
            }
            None => RespValue::null(),
        }
    }

    fn name(&self) -> &'static str {
        "HGETALL"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}
