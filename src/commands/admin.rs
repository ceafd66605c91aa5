//! Connection-level commands (PING)

use super::{extract_bulk_string, Command};
use crate::protocol::RespValue;
use crate::store::Store;

/// PING command - Returns PONG, or echoes the argument back
///
/// Syntax: PING [message]
pub struct PingCommand;

impl Command for PingCommand {
    fn execute(&self, _store: &Store, args: &[RespValue]) -> RespValue {
        match args.first() {
            None => RespValue::simple_string("PONG"),
            Some(message) => match extract_bulk_string(message) {
                Ok(bytes) => RespValue::simple_string(String::from_utf8_lossy(&bytes)),
                Err(e) => RespValue::error(format!("ERR {}", e)),
            },
        }
    }

    fn name(&self) -> &'static str {
        "PING"
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping() {
        let store = Store::new();
        assert_eq!(PingCommand.execute(&store, &[]), RespValue::simple_string("PONG"));
    }

    #[test]
    fn test_ping_echo() {
        let store = Store::new();
        let args = vec![RespValue::bulk_string("hello")];
        assert_eq!(PingCommand.execute(&store, &args), RespValue::simple_string("hello"));
    }
}
