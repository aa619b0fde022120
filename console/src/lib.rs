//! Interactive console built on [`termline_core`].
//!
//! This crate owns everything around the line parser that a remote-access
//! console needs to be usable:
//!
//! - [`ConsoleConfig`] — YAML configuration (prompt, log filter, which
//!   commands may run).
//! - [`SessionRegistry`] — connected sessions and the channels they own.
//! - [`CommandTable`] and [`CommandHandler`] — named commands that read the
//!   parsed line through its query methods.
//! - [`Dispatcher`] — routes submitted lines to handlers and reports the
//!   [`CompletionContext`] of a line still being typed.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use termline_console::*;
//!
//! let registry = Arc::new(SessionRegistry::new());
//! let dispatcher = Dispatcher::new(
//!     CommandTable::builtin(),
//!     Arc::clone(&registry),
//!     ConsoleConfig::default(),
//! );
//!
//! let mut out = Vec::new();
//! dispatcher.execute("help -c kill", &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("kill <id>"));
//! ```

mod commands;
mod config;
mod dispatch;
mod error;
mod registry;

pub use commands::{CommandHandler, CommandTable, Context, Exit, Help, Kill, List, Outcome};
pub use config::ConsoleConfig;
pub use dispatch::{CompletionContext, Dispatcher};
pub use error::{ConsoleError, Result};
pub use registry::{Channel, Session, SessionRegistry};
