//! Error types for console operations.
//!
//! Covers configuration I/O, command lookup and dispatch, session registry
//! bookkeeping, and query failures raised by command handlers.

use termline_core::QueryError;
use thiserror::Error;

/// Errors that can occur while running the console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// File or terminal I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A handler asked the parsed line for something it does not have.
    #[error("{0}")]
    QueryError(#[from] QueryError),

    /// No handler is registered under this name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The command exists but the configuration refuses it.
    #[error("command disabled: {0}")]
    CommandDisabled(String),

    /// A session with this id is already registered.
    #[error("session already registered: {0}")]
    DuplicateSession(String),

    /// No session with this id is registered.
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// The command was invoked with the wrong shape.
    #[error("usage: {0}")]
    Usage(String),
}

/// Convenience alias for results with [`ConsoleError`].
pub type Result<T> = std::result::Result<T, ConsoleError>;
