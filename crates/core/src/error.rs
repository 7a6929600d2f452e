//! Error types for the collection engine.
//!
//! One unified [`Error`] enum covers every user-visible failure; each
//! variant's `Display` form is its stable wire message, used verbatim in
//! error replies and in replication-observable behaviour.
//!
//! Internal invariant violations (an unknown encoding tag, an impossible
//! branch) are deliberately *not* represented here: those are programmer
//! errors and panic, because the invariant was meant to be unbreakable.
//! User errors leave all state unchanged; there is no partial mutation to
//! roll back.

use thiserror::Error;

/// Unified result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Every user-visible error the engine can produce.
///
/// The `Display` implementation renders the stable wire message, including
/// the conventional `ERR`/`WRONGTYPE` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The key exists but holds a different container type.
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    /// The key does not exist, for operations that distinguish missing
    /// from empty (`LSET`).
    #[error("ERR no such key")]
    NoSuchKey,

    /// Index arithmetic landed outside `[0, len)` after normalisation.
    #[error("ERR index out of range")]
    OutOfRange,

    /// Malformed sub-keyword, e.g. an `LINSERT` side other than
    /// BEFORE/AFTER.
    #[error("ERR syntax error")]
    Syntax,

    /// Wrong argument count for a command.
    #[error("ERR wrong number of arguments for '{command}' command")]
    WrongArity {
        /// Lower-case command name as it appears on the wire.
        command: &'static str,
    },

    /// An argument that must be an integer was not one.
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    /// A blocking timeout that failed to parse as an integer.
    #[error("ERR timeout is not an integer or out of range")]
    TimeoutNotInteger,

    /// A blocking timeout below zero.
    #[error("ERR timeout is negative")]
    TimeoutNegative,

    /// A command name the engine does not know.
    #[error("ERR unknown command '{command}'")]
    UnknownCommand {
        /// The unrecognised name, lower-cased.
        command: String,
    },
}

impl Error {
    /// The conventional error-class prefix of the wire message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::WrongType => "WRONGTYPE",
            _ => "ERR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages_are_stable() {
        assert_eq!(
            Error::WrongType.to_string(),
            "WRONGTYPE Operation against a key holding the wrong kind of value"
        );
        assert_eq!(Error::NoSuchKey.to_string(), "ERR no such key");
        assert_eq!(Error::OutOfRange.to_string(), "ERR index out of range");
        assert_eq!(
            Error::WrongArity { command: "sadd" }.to_string(),
            "ERR wrong number of arguments for 'sadd' command"
        );
        assert_eq!(Error::TimeoutNegative.to_string(), "ERR timeout is negative");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::WrongType.code(), "WRONGTYPE");
        assert_eq!(Error::Syntax.code(), "ERR");
        assert_eq!(Error::NotAnInteger.code(), "ERR");
    }
}
