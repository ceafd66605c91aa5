//! String commands (SET, GET)

use super::{extract_args, Command};
use crate::protocol::RespValue;
use crate::store::Store;

/// SET command - Set a key to a value
///
/// Syntax: SET key value
pub struct SetCommand;

impl Command for SetCommand {
    fn execute(&self, store: &Store, args: &[RespValue]) -> RespValue {
        let [key, value] = match extract_args::<2>(args) {
            Ok(parts) => parts,
            Err(e) => return e,
        };

        store.strings().set(key, value);

        RespValue::simple_string("OK")
    }

    fn name(&self) -> &'static str {
        "SET"
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }

    fn is_write(&self) -> bool {
        true
    }
}

/// GET command - Get the value of a key
///
/// Syntax: GET key
pub struct GetCommand;

impl Command for GetCommand {
    fn execute(&self, store: &Store, args: &[RespValue]) -> RespValue {
        let [key] = match extract_args::<1>(args) {
            Ok(parts) => parts,
            Err(e) => return e,
        };

        match store.strings().get(&key) {
            Some(value) => RespValue::bulk_string(value),
            None => RespValue::null(),
        }
    }

    fn name(&self) -> &'static str {
        "GET"
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}
