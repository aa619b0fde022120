//! Cursor-aware command line parsing for interactive shells.
//!
//! This crate turns a possibly incomplete line of keystrokes plus a cursor
//! offset into a structured [`ParsedLine`]:
//!
//! - [`Command`] — the first unclaimed word of the line.
//! - [`Flag`] — a dash-introduced option and the arguments it captured.
//! - [`Argument`] — any other whitespace-delimited word.
//! - [`ParsedLine::focus`] — the [`Node`] under the cursor.
//! - [`ParsedLine::section`] — the flag that gives the cursor its context,
//!   used to offer flag-specific completions.
//!
//! Bundled short options (`-abc`) expand into independent flags that never
//! own arguments, since nothing at parse time says which of them takes one.
//!
//! Command handlers read values through the query methods on [`ParsedLine`]
//! ([`get_arg`](ParsedLine::get_arg), [`expect_args`](ParsedLine::expect_args),
//! ...), which report [`QueryError`] on missing flags or wrong arity.
//!
//! # Example
//!
//! ```
//! use termline_core::*;
//!
//! let line = "connect -a -b foo";
//! let parsed = parse_line(line, line.len());
//!
//! assert_eq!(parsed.command_name(), Some("connect"));
//! assert_eq!(parsed.section.as_ref().unwrap().value(), "b");
//! assert_eq!(parsed.get_arg_string("b").unwrap(), "foo");
//! assert!(matches!(parsed.get_arg("c"), Err(QueryError::FlagNotSet(_))));
//! ```

mod parse;
mod query;
pub mod scan;
mod types;

pub use parse::{ParsedLine, parse_line};
pub use query::{QueryError, Result};
pub use types::*;
