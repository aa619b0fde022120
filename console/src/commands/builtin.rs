//! Commands every console ships with.

use std::io::Write;

use termline_core::ParsedLine;

use super::{CommandHandler, Context, Outcome};
use crate::error::{ConsoleError, Result};

/// `help [command]` or `help -c command`.
#[derive(Debug, Clone, Copy)]
pub struct Help;

impl CommandHandler for Help {
    fn run(&self, ctx: &Context<'_>, line: &ParsedLine, out: &mut dyn Write) -> Result<Outcome> {
        let target = if line.is_set("c") {
            Some(line.get_arg_string("c")?)
        } else {
            line.arguments_as_strings().first().copied()
        };

        if let Some(name) = target {
            let handler = ctx
                .commands
                .get(name)
                .ok_or_else(|| ConsoleError::UnknownCommand(name.to_string()))?;
            writeln!(out, "{}", handler.help(true))?;
            return Ok(Outcome::Continue);
        }

        writeln!(out, "Commands:")?;
        let width = ctx.commands.names().iter().map(|n| n.len()).max().unwrap_or(0);
        for (name, handler) in ctx.commands.iter() {
            writeln!(out, "  {name:<width$}  {}", handler.help(false))?;
        }
        Ok(Outcome::Continue)
    }

    fn help(&self, explain: bool) -> String {
        if explain {
            return "help [command]\n  \
                    List commands, or show the usage of one.\n  \
                    -c <command>  Command to describe"
                .to_string();
        }
        "Show command help".to_string()
    }
}

/// `exit`: leaves the console.
#[derive(Debug, Clone, Copy)]
pub struct Exit;

impl CommandHandler for Exit {
    fn run(&self, _ctx: &Context<'_>, _line: &ParsedLine, _out: &mut dyn Write) -> Result<Outcome> {
        Ok(Outcome::Exit)
    }

    fn help(&self, explain: bool) -> String {
        if explain {
            return "exit\n  Close this console session.".to_string();
        }
        "Close this console session".to_string()
    }
}

/// `ls [-f filter]`: lists registered sessions.
#[derive(Debug, Clone, Copy)]
pub struct List;

impl CommandHandler for List {
    fn run(&self, ctx: &Context<'_>, line: &ParsedLine, out: &mut dyn Write) -> Result<Outcome> {
        let filter = if line.is_set("f") {
            Some(line.get_arg("f")?.value())
        } else {
            None
        };

        let ids: Vec<String> = ctx
            .registry
            .ids()
            .into_iter()
            .filter(|id| filter.is_none_or(|f| id.contains(f)))
            .collect();

        if ids.is_empty() {
            writeln!(out, "No sessions")?;
            return Ok(Outcome::Continue);
        }
        for id in ids {
            writeln!(out, "{id}")?;
        }
        Ok(Outcome::Continue)
    }

    fn help(&self, explain: bool) -> String {
        if explain {
            return "ls [-f <filter>]\n  \
                    List connected sessions.\n  \
                    -f <filter>  Only show ids containing this text"
                .to_string();
        }
        "List connected sessions".to_string()
    }
}

/// `kill <id>...`: disconnects sessions.
///
/// Every known id is disconnected even when others are unknown; the unknown
/// ones are then reported together.
#[derive(Debug, Clone, Copy)]
pub struct Kill;

impl CommandHandler for Kill {
    fn run(&self, ctx: &Context<'_>, line: &ParsedLine, out: &mut dyn Write) -> Result<Outcome> {
        let ids = line.arguments_as_strings();
        if ids.is_empty() {
            return Err(ConsoleError::Usage(self.help(true)));
        }

        let mut missing = Vec::new();
        for id in ids {
            if ctx.registry.remove(id).is_none() {
                missing.push(id);
                continue;
            }
            writeln!(out, "{id} disconnected")?;
        }

        if !missing.is_empty() {
            return Err(ConsoleError::UnknownSession(missing.join(", ")));
        }
        Ok(Outcome::Continue)
    }

    fn help(&self, explain: bool) -> String {
        if explain {
            return "kill <id>...\n  Disconnect one or more sessions.".to_string();
        }
        "Disconnect sessions".to_string()
    }
}
