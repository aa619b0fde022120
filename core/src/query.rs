//! Read-only accessors used by command handlers.
//!
//! Handlers receive a [`ParsedLine`] for a submitted line and pull typed
//! values out of it. Asking for a flag that was never typed is an error
//! distinct from a flag that was typed without arguments.

use thiserror::Error;

use crate::parse::ParsedLine;
use crate::types::{Argument, Flag};

/// Errors returned by the [`ParsedLine`] query methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The flag does not appear on the line.
    #[error("flag not set: {0}")]
    FlagNotSet(String),
    /// The flag is present with the wrong number of arguments.
    #[error("flag: {flag} expects {expected} arguments, got {found}")]
    ArityMismatch {
        flag: String,
        expected: usize,
        found: usize,
    },
    /// The flag is present but has no arguments.
    #[error("flag: {0} expects at least 1 argument")]
    InsufficientArguments(String),
}

/// Convenience alias for results with [`QueryError`].
pub type Result<T> = std::result::Result<T, QueryError>;

impl ParsedLine {
    fn flag(&self, name: &str) -> Result<&Flag> {
        self.flags
            .get(name)
            .ok_or_else(|| QueryError::FlagNotSet(name.to_string()))
    }

    /// Returns `true` if a flag with this name was typed.
    pub fn is_set(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Arguments owned by the flag. A present flag with no arguments yields
    /// an empty slice.
    ///
    /// # Errors
    ///
    /// [`QueryError::FlagNotSet`] when the flag is absent.
    pub fn get_args(&self, name: &str) -> Result<&[Argument]> {
        self.flag(name).map(Flag::args)
    }

    /// Argument values owned by the flag.
    pub fn get_args_string(&self, name: &str) -> Result<Vec<&str>> {
        self.flag(name).map(Flag::arg_values)
    }

    /// Arguments owned by the flag, requiring exactly `needs` of them.
    ///
    /// # Errors
    ///
    /// [`QueryError::FlagNotSet`] when the flag is absent,
    /// [`QueryError::ArityMismatch`] when the count differs.
    ///
    /// # Examples
    ///
    /// ```
    /// use termline_core::{QueryError, parse_line};
    ///
    /// let line = parse_line("proxy --bind 127.0.0.1", 0);
    /// assert_eq!(line.expect_args("bind", 1).unwrap()[0].value(), "127.0.0.1");
    /// assert!(matches!(
    ///     line.expect_args("bind", 2),
    ///     Err(QueryError::ArityMismatch { expected: 2, found: 1, .. })
    /// ));
    /// ```
    pub fn expect_args(&self, name: &str, needs: usize) -> Result<&[Argument]> {
        let args = self.get_args(name)?;
        if args.len() != needs {
            return Err(QueryError::ArityMismatch {
                flag: name.to_string(),
                expected: needs,
                found: args.len(),
            });
        }
        Ok(args)
    }

    /// The single argument of the flag.
    pub fn get_arg(&self, name: &str) -> Result<&Argument> {
        let args = self.expect_args(name, 1)?;
        Ok(&args[0])
    }

    /// Value of the flag's first argument; further arguments are ignored.
    ///
    /// # Errors
    ///
    /// [`QueryError::FlagNotSet`] when the flag is absent,
    /// [`QueryError::InsufficientArguments`] when it has no arguments.
    pub fn get_arg_string(&self, name: &str) -> Result<&str> {
        self.flag(name)?
            .args()
            .first()
            .map(Argument::value)
            .ok_or_else(|| QueryError::InsufficientArguments(name.to_string()))
    }

    /// Values of the top-level arguments, in order.
    pub fn arguments_as_strings(&self) -> Vec<&str> {
        self.arguments.iter().map(Argument::value).collect()
    }

    /// The command word, if any.
    pub fn command_name(&self) -> Option<&str> {
        self.command.as_ref().map(|c| c.value())
    }

    /// Distinct flag names in sorted order.
    pub fn flag_names(&self) -> Vec<&str> {
        self.flags.keys().map(String::as_str).collect()
    }
}
