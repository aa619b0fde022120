//! Command handlers and the table that names them.

mod builtin;

use std::collections::BTreeMap;
use std::io::Write;

use termline_core::ParsedLine;

use crate::error::Result;
use crate::registry::SessionRegistry;

pub use builtin::{Exit, Help, Kill, List};

/// What the console should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// State a handler may consult while it runs.
pub struct Context<'a> {
    pub commands: &'a CommandTable,
    pub registry: &'a SessionRegistry,
}

/// A named console command.
///
/// Handlers read their flags and arguments through the query methods on
/// [`ParsedLine`] and write human-readable output to `out`.
pub trait CommandHandler: Send + Sync {
    fn run(&self, ctx: &Context<'_>, line: &ParsedLine, out: &mut dyn Write) -> Result<Outcome>;

    /// One-line summary, or the full usage text when `explain` is set.
    fn help(&self, explain: bool) -> String;
}

/// Handlers by command name.
///
/// # Examples
///
/// ```
/// use termline_console::CommandTable;
///
/// let table = CommandTable::builtin();
/// assert_eq!(table.names(), vec!["exit", "help", "kill", "ls"]);
/// ```
#[derive(Default)]
pub struct CommandTable {
    handlers: BTreeMap<String, Box<dyn CommandHandler>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding `help`, `exit`, `ls` and `kill`.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert("help", Help);
        table.insert("exit", Exit);
        table.insert("ls", List);
        table.insert("kill", Kill);
        table
    }

    /// Registers `handler` under `name`, replacing any previous handler.
    pub fn insert(&mut self, name: impl Into<String>, handler: impl CommandHandler + 'static) {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<&dyn CommandHandler> {
        self.handlers.get(name).map(|handler| handler.as_ref())
    }

    /// Command names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn CommandHandler)> {
        self.handlers
            .iter()
            .map(|(name, handler)| (name.as_str(), handler.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers.keys()).finish()
    }
}
