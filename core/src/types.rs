//! Node type definitions for parsed command lines.
//!
//! Every token the parser produces is one of three [`Node`] variants sharing
//! the same payload: an inclusive byte [`Span`] into the raw line and the
//! decoded text. Nodes are built by the scanners in [`crate::scan`] and are
//! never mutated once [`parse_line`](crate::parse_line) returns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive byte range of a token inside the raw line.
///
/// A token terminated by a space ends on that space; a token terminated by
/// the end of the line ends at `line.len()`. This lets a cursor parked just
/// after the last typed character still land inside the token being typed.
///
/// # Examples
///
/// ```
/// use termline_core::Span;
///
/// let span = Span::new(3, 7);
/// assert!(span.contains(3));
/// assert!(span.contains(7));
/// assert!(!span.contains(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset of the last byte (inclusive).
    pub end: usize,
}

impl Span {
    /// Creates a span from inclusive bounds.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns `true` when `offset` falls within the span, bounds included.
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }
}

/// Discriminator reported by [`Node::kind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Command,
    Flag,
    Argument,
}

impl NodeKind {
    /// Returns the lowercase tag (`"command"`, `"flag"` or `"argument"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Command => "command",
            NodeKind::Flag => "flag",
            NodeKind::Argument => "argument",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A whitespace-delimited value token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    span: Span,
    value: String,
}

impl Argument {
    pub(crate) fn new(span: Span, value: impl Into<String>) -> Self {
        Self {
            span,
            value: value.into(),
        }
    }

    /// The token text.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// The command word of a line: the first top-level argument, promoted once
/// the scan is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    span: Span,
    value: String,
}

impl Command {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}

impl From<Argument> for Command {
    fn from(arg: Argument) -> Self {
        Self {
            span: arg.span,
            value: arg.value,
        }
    }
}

/// A dash-introduced option together with the arguments it captured.
///
/// The stored value has its leading dashes stripped, so both `-v` and
/// `--verbose` are looked up by their bare names (`"v"`, `"verbose"`).
///
/// # Examples
///
/// ```
/// use termline_core::parse_line;
///
/// let line = parse_line("scp --port 2222 -v", 0);
/// let port = &line.flags["port"];
/// assert!(port.is_long());
/// assert_eq!(port.arg_values(), vec!["2222"]);
///
/// let verbose = &line.flags["v"];
/// assert!(!verbose.is_long());
/// assert!(verbose.args().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    span: Span,
    value: String,
    args: Vec<Argument>,
    long: bool,
}

impl Flag {
    pub(crate) fn new(span: Span, value: impl Into<String>, long: bool) -> Self {
        Self {
            span,
            value: value.into(),
            args: Vec::new(),
            long,
        }
    }

    /// Flag name without leading dashes.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Whether the flag was introduced by two or more dashes.
    pub fn is_long(&self) -> bool {
        self.long
    }

    /// Arguments owned by this flag, in textual order.
    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    /// Values of the owned arguments.
    pub fn arg_values(&self) -> Vec<&str> {
        self.args.iter().map(Argument::value).collect()
    }

    pub(crate) fn capture(&mut self, args: impl IntoIterator<Item = Argument>) {
        self.args.extend(args);
    }
}

/// Any syntactic element of a parsed line.
///
/// # Examples
///
/// ```
/// use termline_core::{NodeKind, parse_line};
///
/// let line = parse_line("kill client-7", 6);
/// let focus = line.focus.as_ref().unwrap();
/// assert_eq!(focus.kind(), NodeKind::Argument);
/// assert_eq!(focus.value(), "client-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    Command(Command),
    Flag(Flag),
    Argument(Argument),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Command(_) => NodeKind::Command,
            Node::Flag(_) => NodeKind::Flag,
            Node::Argument(_) => NodeKind::Argument,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Node::Command(c) => c.value(),
            Node::Flag(f) => f.value(),
            Node::Argument(a) => a.value(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Command(c) => c.span(),
            Node::Flag(f) => f.span(),
            Node::Argument(a) => a.span(),
        }
    }

    pub fn start(&self) -> usize {
        self.span().start
    }

    pub fn end(&self) -> usize {
        self.span().end
    }

    /// Returns the flag payload when this node is a flag.
    pub fn as_flag(&self) -> Option<&Flag> {
        match self {
            Node::Flag(f) => Some(f),
            _ => None,
        }
    }
}
