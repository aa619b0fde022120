//! Line parser.
//!
//! Drives the scanners over the whole line in a single left-to-right pass,
//! then resolves the cursor's section and promotes the command word.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scan::{scan_arguments, scan_flag};
use crate::types::{Argument, Command, Flag, Node};

/// Result of parsing one line at one cursor position.
///
/// A fresh value is built for every call to [`parse_line`]; it is never
/// updated in place. Only [`parse_line`] keeps the fields consistent with
/// each other (`flags` indexing the last of each name in `flags_ordered`,
/// `focus` and `section` drawn from the same line). A value obtained by
/// deserializing carries no such guarantee.
///
/// # Examples
///
/// ```
/// use termline_core::{NodeKind, parse_line};
///
/// let line = "connect --verbose host1";
/// let parsed = parse_line(line, line.find("host1").unwrap());
///
/// assert_eq!(parsed.command.as_ref().unwrap().value(), "connect");
/// assert_eq!(parsed.flags["verbose"].arg_values(), vec!["host1"]);
/// assert_eq!(parsed.focus.as_ref().unwrap().kind(), NodeKind::Argument);
/// assert_eq!(parsed.section.as_ref().unwrap().value(), "verbose");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Flags in textual order; repeated names appear once per occurrence.
    pub flags_ordered: Vec<Flag>,
    /// Flags by name; the last occurrence of a name wins.
    pub flags: BTreeMap<String, Flag>,
    /// Top-level arguments not owned by a flag and not promoted to command.
    pub arguments: Vec<Argument>,
    pub command: Option<Command>,
    /// Node under the cursor.
    pub focus: Option<Node>,
    /// Flag giving context to the cursor position.
    pub section: Option<Flag>,
    pub raw_line: String,
}

/// Cursor-tracking state that may refer into the flag list before it is
/// final.
enum Slot<T> {
    Ordered(usize),
    Detached(T),
}

/// Parses `line` and annotates the node under byte offset `cursor`.
///
/// Never fails: stray dashes and empty bundles degrade into empty-valued
/// flags, and a cursor outside the line simply matches no node.
///
/// Bundled short options never capture arguments, so a word after a bundle
/// is a plain top-level argument. When it is the first one on the line it
/// is promoted to [`ParsedLine::command`] like any other, which is why
/// `value` below ends up as the command rather than in `arguments`.
///
/// # Examples
///
/// ```
/// use termline_core::parse_line;
///
/// let parsed = parse_line("-aft value", 0);
/// let names: Vec<&str> = parsed.flags_ordered.iter().map(|f| f.value()).collect();
/// assert_eq!(names, vec!["a", "f", "t"]);
/// assert!(parsed.flags_ordered.iter().all(|f| f.args().is_empty()));
/// assert_eq!(parsed.command.unwrap().value(), "value");
/// assert!(parsed.arguments.is_empty());
/// ```
pub fn parse_line(line: &str, cursor: usize) -> ParsedLine {
    let bytes = line.as_bytes();

    let mut flags_ordered: Vec<Flag> = Vec::new();
    let mut arguments: Vec<Argument> = Vec::new();
    let mut capture: Option<usize> = None;
    let mut focus: Option<Slot<Node>> = None;
    let mut section: Option<Slot<Flag>> = None;

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'-' {
            let (flag, last) = scan_flag(line, i);
            let focused = flag.span().contains(cursor);
            i = last + 1;

            if flag.is_long() || flag.value().chars().count() == 1 {
                let idx = flags_ordered.len();
                flags_ordered.push(flag);
                capture = Some(idx);
                if focused {
                    focus = Some(Slot::Ordered(idx));
                    section = Some(Slot::Ordered(idx));
                }
                continue;
            }

            // Bundles like `-aft` cannot say which option owns a following
            // argument, so none of them capture.
            capture = None;
            for ch in flag.value().chars() {
                flags_ordered.push(Flag::new(flag.span(), ch.to_string(), false));
            }
            if focused {
                focus = Some(Slot::Detached(Node::Flag(flag.clone())));
                section = Some(Slot::Detached(flag));
            }
            continue;
        }

        let (args, last) = scan_arguments(line, i);
        i = last + 1;

        for arg in &args {
            if arg.span().contains(cursor) {
                focus = Some(Slot::Detached(Node::Argument(arg.clone())));
                section = capture.map(Slot::Ordered);
            }
        }

        match capture {
            Some(idx) => flags_ordered[idx].capture(args),
            None => arguments.extend(args),
        }
    }

    let section = resolve_section(&flags_ordered, section, cursor);

    let mut command = None;
    if !arguments.is_empty() {
        let promoted = Command::from(arguments.remove(0));
        if promoted.span().contains(cursor) {
            focus = Some(Slot::Detached(Node::Command(promoted.clone())));
        }
        command = Some(promoted);
    }

    let focus = focus.map(|slot| match slot {
        Slot::Ordered(idx) => Node::Flag(flags_ordered[idx].clone()),
        Slot::Detached(node) => node,
    });

    let flags: BTreeMap<String, Flag> = flags_ordered
        .iter()
        .map(|flag| (flag.value().to_string(), flag.clone()))
        .collect();

    debug!(
        line,
        cursor,
        flags = flags_ordered.len(),
        arguments = arguments.len(),
        command = ?command.as_ref().map(Command::value),
        focus = ?focus.as_ref().map(Node::kind),
        "Parsed line"
    );

    ParsedLine {
        flags_ordered,
        flags,
        arguments,
        command,
        focus,
        section,
        raw_line: line.to_string(),
    }
}

/// Picks the flag that contextualises the cursor.
///
/// A flag whose span contains the cursor always wins. Otherwise a section
/// chosen during the scan is kept, and failing that the nearest flag ending
/// at or before the cursor is used.
fn resolve_section(
    flags_ordered: &[Flag],
    scanned: Option<Slot<Flag>>,
    cursor: usize,
) -> Option<Flag> {
    if let Some(containing) = flags_ordered
        .iter()
        .rev()
        .find(|flag| flag.span().contains(cursor))
    {
        return Some(containing.clone());
    }

    match scanned {
        Some(Slot::Ordered(idx)) => Some(flags_ordered[idx].clone()),
        Some(Slot::Detached(flag)) => Some(flag),
        None => flags_ordered
            .iter()
            .rev()
            .find(|flag| flag.end() <= cursor)
            .cloned(),
    }
}
