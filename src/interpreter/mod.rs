//! Command interpreter
//!
//! Looks commands up in the registry, checks their arity and runs them
//! against the store it owns. Live connections and log replay both go
//! through `Interpreter::interpret`.

use crate::commands::CommandRegistry;
use crate::protocol::RespValue;
use crate::store::Store;
use thiserror::Error;
use tracing::{debug, warn};

/// A client request split into command name and arguments
#[derive(Debug, PartialEq)]
pub struct Request<'a> {
    /// Upper-cased command name
    pub name: String,
    pub args: &'a [RespValue],
}

/// Why a decoded value is not a usable request
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("expected array, got {0}")]
    NotAnArray(String),

    #[error("empty command array")]
    Empty,

    #[error("command name must be a bulk string, got {0}")]
    InvalidName(String),
}

impl<'a> Request<'a> {
    /// Split a top-level array into command name and arguments
    pub fn from_value(value: &'a RespValue) -> Result<Self, RequestError> {
        let parts = value
            .as_array()
            .ok_or_else(|| RequestError::NotAnArray(value.to_string()))?;

        let (name, args) = parts.split_first().ok_or(RequestError::Empty)?;
        let name = name
            .as_bytes()
            .ok_or_else(|| RequestError::InvalidName(name.to_string()))?;

        Ok(Request {
            name: String::from_utf8_lossy(name).to_uppercase(),
            args,
        })
    }
}

/// Command interpreter over an owned store
pub struct Interpreter {
    registry: CommandRegistry,
    store: Store,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_store(Store::new())
    }

    pub fn with_store(store: Store) -> Self {
        let registry = CommandRegistry::new();
        debug!("Registered commands: {:?}", registry.command_names());

        Interpreter { registry, store }
    }

    /// Execute `command` with `args` and produce the response
    ///
    /// Unknown commands and arity mismatches become error values; the store is
    /// not touched in either case.
    pub fn interpret(&self, command: &str, args: &[RespValue]) -> RespValue {
        let handler = match self.registry.get(command) {
            Some(handler) => handler,
            None => {
                warn!("Unknown command: {}", command);
                return RespValue::error(format!("Command {} not supported", command));
            }
        };

        let too_few = args.len() < handler.min_args();
        let too_many = handler.max_args().map_or(false, |max| args.len() > max);
        if too_few || too_many {
            return RespValue::error(format!(
                "ERR wrong number of arguments for '{}' command",
                handler.name().to_lowercase()
            ));
        }

        debug!("Executing {} with {} arguments", handler.name(), args.len());
        handler.execute(&self.store, args)
    }

    /// Run a full request value (array of command name and arguments)
    pub fn execute(&self, request: &Request<'_>) -> RespValue {
        self.interpret(&request.name, request.args)
    }

    /// Whether `command` mutates the store and must be persisted
    pub fn is_write_command(&self, command: &str) -> bool {
        self.registry
            .get(command)
            .map_or(false, |handler| handler.is_write())
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn run(interpreter: &Interpreter, parts: &[&'static str]) -> RespValue {
        let value = RespValue::command(parts.iter().copied());
        let request = Request::from_value(&value).unwrap();
        interpreter.execute(&request)
    }

    #[test]
    fn test_set_get() {
        let interpreter = Interpreter::new();

        assert_eq!(run(&interpreter, &["SET", "mykey", "myvalue"]), RespValue::simple_string("OK"));
        assert_eq!(
            run(&interpreter, &["GET", "mykey"]),
            RespValue::bulk_string(Bytes::from("myvalue"))
        );
    }

    #[test]
    fn test_lowercase_request_name() {
        let interpreter = Interpreter::new();

        assert_eq!(run(&interpreter, &["ping"]), RespValue::simple_string("PONG"));
    }

    #[test]
    fn test_unknown_command() {
        let interpreter = Interpreter::new();

        let result = interpreter.interpret("FLUSHALL", &[]);
        assert_eq!(result, RespValue::error("Command FLUSHALL not supported"));
    }

    #[test]
    fn test_arity_errors_leave_store_untouched() {
        let interpreter = Interpreter::new();
        run(&interpreter, &["SET", "foo", "bar"]);

        assert_eq!(
            run(&interpreter, &["SET", "foo"]),
            RespValue::error("ERR wrong number of arguments for 'set' command")
        );
        assert_eq!(
            run(&interpreter, &["SET", "foo", "baz", "extra"]),
            RespValue::error("ERR wrong number of arguments for 'set' command")
        );
        assert_eq!(interpreter.store().strings().get(b"foo"), Some(Bytes::from("bar")));
    }

    #[test]
    fn test_arity_of_every_command() {
        let interpreter = Interpreter::new();

        let cases: [&[&'static str]; 8] = [
            &["GET"],
            &["GET", "a", "b"],
            &["HSET", "h", "f"],
            &["HSET", "h", "f", "v", "extra"],
            &["HGET", "h"],
            &["HGETALL"],
            &["HGETALL", "h", "x"],
            &["PING", "a", "b"],
        ];

        for parts in cases {
            let result = run(&interpreter, parts);
            assert_eq!(
                result,
                RespValue::error(format!(
                    "ERR wrong number of arguments for '{}' command",
                    parts[0].to_lowercase()
                )),
                "{:?}",
                parts
            );
        }
        assert!(interpreter.store().hashes().is_empty());
    }

    #[test]
    fn test_write_classification() {
        let interpreter = Interpreter::new();

        assert!(interpreter.is_write_command("SET"));
        assert!(interpreter.is_write_command("HSET"));
        assert!(!interpreter.is_write_command("GET"));
        assert!(!interpreter.is_write_command("HGET"));
        assert!(!interpreter.is_write_command("HGETALL"));
        assert!(!interpreter.is_write_command("PING"));
        assert!(!interpreter.is_write_command("NOPE"));
    }

    #[test]
    fn test_request_from_value() {
        let value = RespValue::command(["set", "k", "v"]);
        let request = Request::from_value(&value).unwrap();

        assert_eq!(request.name, "SET");
        assert_eq!(request.args, &[RespValue::bulk_string("k"), RespValue::bulk_string("v")][..]);
    }

    #[test]
    fn test_request_from_invalid_values() {
        assert!(matches!(
            Request::from_value(&RespValue::simple_string("PING")),
            Err(RequestError::NotAnArray(_))
        ));
        assert_eq!(
            Request::from_value(&RespValue::array(vec![])),
            Err(RequestError::Empty)
        );
        assert!(matches!(
            Request::from_value(&RespValue::array(vec![RespValue::integer(1)])),
            Err(RequestError::InvalidName(_))
        ));
    }
}
