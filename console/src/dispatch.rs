//! Line dispatch and completion context.
//!
//! The [`Dispatcher`] is the consumer of [`ParsedLine`]: while the user
//! types it reports what sits under the cursor, and once a line is submitted
//! it routes the parsed line to the matching [`CommandHandler`].
//!
//! [`ParsedLine`]: termline_core::ParsedLine
//! [`CommandHandler`]: crate::CommandHandler

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;
use termline_core::{Node, NodeKind, parse_line};
use tracing::{debug, info};

use crate::commands::{CommandTable, Context, Outcome};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::registry::SessionRegistry;

/// What an autocomplete engine needs to know about the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionContext {
    /// Command word of the line, if any.
    pub command: Option<String>,
    /// Node under the cursor.
    pub focus: Option<Node>,
    /// Name of the flag giving the cursor its context.
    pub section: Option<String>,
    /// Command names that complete the word under the cursor, when the
    /// cursor is on the command word or the line has none yet.
    pub candidates: Vec<String>,
}

/// Routes submitted lines to command handlers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use termline_console::{CommandTable, ConsoleConfig, Dispatcher, Outcome, SessionRegistry};
///
/// let dispatcher = Dispatcher::new(
///     CommandTable::builtin(),
///     Arc::new(SessionRegistry::new()),
///     ConsoleConfig::default(),
/// );
///
/// let mut out = Vec::new();
/// assert_eq!(dispatcher.execute("ls", &mut out).unwrap(), Outcome::Continue);
/// assert_eq!(String::from_utf8(out).unwrap(), "No sessions\n");
///
/// let ctx = dispatcher.complete_context("he", 2);
/// assert_eq!(ctx.candidates, vec!["help"]);
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    commands: CommandTable,
    registry: Arc<SessionRegistry>,
    config: ConsoleConfig,
}

impl Dispatcher {
    pub fn new(
        commands: CommandTable,
        registry: Arc<SessionRegistry>,
        config: ConsoleConfig,
    ) -> Self {
        Self {
            commands,
            registry,
            config,
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    /// Parses a submitted line and runs its command.
    ///
    /// A line without a command word does nothing.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::CommandDisabled`] when the configuration refuses the
    /// command, [`ConsoleError::UnknownCommand`] when no handler has its
    /// name, or whatever the handler itself returns.
    pub fn execute(&self, raw: &str, out: &mut dyn Write) -> Result<Outcome> {
        let line = parse_line(raw, raw.len());
        let Some(name) = line.command_name() else {
            debug!(line = raw, "No command on line");
            return Ok(Outcome::Continue);
        };

        if !self.config.is_allowed(name) {
            return Err(ConsoleError::CommandDisabled(name.to_string()));
        }

        let handler = self
            .commands
            .get(name)
            .ok_or_else(|| ConsoleError::UnknownCommand(name.to_string()))?;

        info!(command = name, flags = ?line.flag_names(), "Dispatching command");
        let ctx = Context {
            commands: &self.commands,
            registry: &self.registry,
        };
        handler.run(&ctx, &line, out)
    }

    /// Describes the cursor position of a line that is still being typed.
    pub fn complete_context(&self, raw: &str, cursor: usize) -> CompletionContext {
        let line = parse_line(raw, cursor);

        let prefix = match &line.focus {
            Some(node) if node.kind() == NodeKind::Command => Some(node.value()),
            None if line.command.is_none() => Some(""),
            _ => None,
        };
        let candidates = match prefix {
            Some(prefix) => self.command_candidates(prefix),
            None => Vec::new(),
        };

        CompletionContext {
            command: line.command_name().map(String::from),
            section: line.section.as_ref().map(|f| f.value().to_string()),
            focus: line.focus,
            candidates,
        }
    }

    fn command_candidates(&self, prefix: &str) -> Vec<String> {
        self.commands
            .names()
            .into_iter()
            .filter(|name| name.starts_with(prefix) && self.config.is_allowed(name))
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(config: ConsoleConfig) -> Dispatcher {
        Dispatcher::new(
            CommandTable::builtin(),
            Arc::new(SessionRegistry::new()),
            config,
        )
    }

    #[test]
    fn test_empty_line_is_noop() {
        let d = dispatcher(ConsoleConfig::default());
        let mut out = Vec::new();
        assert_eq!(d.execute("", &mut out).unwrap(), Outcome::Continue);
        assert_eq!(d.execute("   ", &mut out).unwrap(), Outcome::Continue);
        assert_eq!(d.execute("-v", &mut out).unwrap(), Outcome::Continue);
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let d = dispatcher(ConsoleConfig::default());
        let err = d.execute("frobnicate --now", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ConsoleError::UnknownCommand(name) if name == "frobnicate"));
    }

    #[test]
    fn test_excluded_command_refused() {
        let d = dispatcher(ConsoleConfig {
            exclude: vec!["exit".into()],
            ..Default::default()
        });
        let err = d.execute("exit", &mut Vec::new()).unwrap_err();
        assert!(matches!(err, ConsoleError::CommandDisabled(_)));
    }

    #[test]
    fn test_exit_outcome() {
        let d = dispatcher(ConsoleConfig::default());
        assert_eq!(d.execute("exit", &mut Vec::new()).unwrap(), Outcome::Exit);
    }

    #[test]
    fn test_candidates_on_empty_line() {
        let d = dispatcher(ConsoleConfig::default());
        let ctx = d.complete_context("", 0);
        assert_eq!(ctx.candidates, vec!["exit", "help", "kill", "ls"]);
        assert!(ctx.command.is_none());
    }

    #[test]
    fn test_candidates_respect_typed_prefix_and_config() {
        let d = dispatcher(ConsoleConfig {
            exclude: vec!["kill".into()],
            ..Default::default()
        });
        let ctx = d.complete_context("k", 1);
        assert!(ctx.candidates.is_empty());

        let ctx = d.complete_context("e", 1);
        assert_eq!(ctx.candidates, vec!["exit"]);
    }

    #[test]
    fn test_context_in_flag_section() {
        let d = dispatcher(ConsoleConfig::default());
        let raw = "help -c l";
        let ctx = d.complete_context(raw, raw.len());
        assert_eq!(ctx.command.as_deref(), Some("help"));
        assert_eq!(ctx.section.as_deref(), Some("c"));
        assert_eq!(ctx.focus.as_ref().map(Node::value), Some("l"));
        assert!(ctx.candidates.is_empty());
    }
}
