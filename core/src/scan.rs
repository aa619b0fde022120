//! Lexical primitives for command lines.
//!
//! Each scanner takes the raw line and a start offset and returns the token
//! it built together with the offset of the last byte it examined, so the
//! driver can resume one byte later. Only the ASCII space separates tokens;
//! there is no quoting or escaping.

use crate::types::{Argument, Flag, Span};

/// Scans a flag token starting at `start`, which must point at a `-`.
///
/// Leading dashes are stripped from the value. The flag is long when two or
/// more dashes precede the first non-dash byte; dashes after that byte are
/// kept (`--dry-run` has the value `dry-run`). A lone `-` or `--` yields an
/// empty, non-long flag.
///
/// # Examples
///
/// ```
/// use termline_core::scan::scan_flag;
///
/// let (flag, last) = scan_flag("ls --color auto", 3);
/// assert_eq!(flag.value(), "color");
/// assert!(flag.is_long());
/// assert_eq!((flag.start(), flag.end()), (3, 10));
/// assert_eq!(last, 10);
/// ```
pub fn scan_flag(line: &str, start: usize) -> (Flag, usize) {
    if !starts_token(line, start) {
        return (Flag::new(Span::new(start, start), "", false), start);
    }
    let bytes = line.as_bytes();
    let mut value_start: Option<usize> = None;
    let mut long = false;

    for (pos, &byte) in bytes.iter().enumerate().skip(start) {
        if byte == b' ' {
            let value = value_start.map_or("", |from| &line[from..pos]);
            return (Flag::new(Span::new(start, pos), value, long), pos);
        }
        if value_start.is_none() && byte != b'-' {
            long = pos - start > 1;
            value_start = Some(pos);
        }
    }

    let value = value_start.map_or("", |from| &line[from..]);
    let last = bytes.len().saturating_sub(1).max(start);
    (Flag::new(Span::new(start, bytes.len()), value, long), last)
}

/// Scans a single argument token starting at `start`.
///
/// Yields an empty argument when `start` itself is a space.
pub fn scan_argument(line: &str, start: usize) -> (Argument, usize) {
    if !starts_token(line, start) {
        return (Argument::new(Span::new(start, start), ""), start);
    }
    let bytes = line.as_bytes();

    for (pos, &byte) in bytes.iter().enumerate().skip(start) {
        if byte == b' ' {
            return (Argument::new(Span::new(start, pos), &line[start..pos]), pos);
        }
    }

    let last = bytes.len().saturating_sub(1).max(start);
    (
        Argument::new(Span::new(start, bytes.len()), &line[start..]),
        last,
    )
}

/// Whether a token can begin at `start`.
fn starts_token(line: &str, start: usize) -> bool {
    start < line.len() && line.is_char_boundary(start)
}

/// Scans a run of arguments separated by spaces.
///
/// Empty tokens produced by repeated spaces are dropped. The run ends at the
/// end of the line or on a space whose next byte is `-`, leaving the flag
/// that follows for the caller.
///
/// # Examples
///
/// ```
/// use termline_core::scan::scan_arguments;
///
/// let line = "a  b -c d";
/// let (args, last) = scan_arguments(line, 0);
/// let values: Vec<&str> = args.iter().map(|a| a.value()).collect();
/// assert_eq!(values, vec!["a", "b"]);
/// assert_eq!(&line[last + 1..], "-c d");
/// ```
pub fn scan_arguments(line: &str, start: usize) -> (Vec<Argument>, usize) {
    let bytes = line.as_bytes();
    let mut args = Vec::new();
    let mut pos = start;
    let mut last = start;

    while pos < bytes.len() {
        let (arg, end) = scan_argument(line, pos);
        last = end;
        if !arg.value().is_empty() {
            args.push(arg);
        }
        if bytes.get(end + 1) == Some(&b'-') {
            break;
        }
        pos = end + 1;
    }

    (args, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_flag() {
        let (flag, last) = scan_flag("-l value", 0);
        assert_eq!(flag.value(), "l");
        assert!(!flag.is_long());
        assert_eq!(flag.span(), Span::new(0, 2));
        assert_eq!(last, 2);
    }

    #[test]
    fn test_flag_at_end_of_line_spans_past_last_byte() {
        let (flag, last) = scan_flag("ls --verb", 3);
        assert_eq!(flag.value(), "verb");
        assert!(flag.is_long());
        assert_eq!(flag.span(), Span::new(3, 9));
        assert_eq!(last, 8);
    }

    #[test]
    fn test_bundle_is_not_long() {
        let (flag, _) = scan_flag("-aft value", 0);
        assert_eq!(flag.value(), "aft");
        assert!(!flag.is_long());
    }

    #[test]
    fn test_inner_dashes_kept() {
        let (flag, _) = scan_flag("--dry-run", 0);
        assert_eq!(flag.value(), "dry-run");
        assert!(flag.is_long());

        let (flag, _) = scan_flag("---x", 0);
        assert_eq!(flag.value(), "x");
        assert!(flag.is_long());
    }

    #[test]
    fn test_lone_dashes_are_empty_short_flags() {
        let (flag, last) = scan_flag("-", 0);
        assert_eq!(flag.value(), "");
        assert!(!flag.is_long());
        assert_eq!(last, 0);

        let (flag, last) = scan_flag("-- x", 0);
        assert_eq!(flag.value(), "");
        assert!(!flag.is_long());
        assert_eq!(last, 2);
    }

    #[test]
    fn test_single_argument() {
        let (arg, last) = scan_argument("host1 rest", 0);
        assert_eq!(arg.value(), "host1");
        assert_eq!(arg.span(), Span::new(0, 5));
        assert_eq!(last, 5);

        let (arg, last) = scan_argument("host1 rest", 6);
        assert_eq!(arg.value(), "rest");
        assert_eq!(arg.span(), Span::new(6, 10));
        assert_eq!(last, 9);
    }

    #[test]
    fn test_argument_on_space_is_empty() {
        let (arg, last) = scan_argument("a  b", 2);
        assert_eq!(arg.value(), "");
        assert_eq!(last, 2);
    }

    #[test]
    fn test_argument_run_to_end_of_line() {
        let (args, last) = scan_arguments("one two three", 0);
        assert_eq!(args.len(), 3);
        assert_eq!(args[2].value(), "three");
        assert_eq!(last, 12);
    }

    #[test]
    fn test_argument_run_stops_before_flag() {
        let line = "one two -x";
        let (args, last) = scan_arguments(line, 0);
        assert_eq!(args.len(), 2);
        assert_eq!(last, 7);
        assert_eq!(line.as_bytes()[last + 1], b'-');
    }

    #[test]
    fn test_argument_run_keeps_embedded_dashes() {
        let (args, _) = scan_arguments("client-7 a-b", 0);
        let values: Vec<&str> = args.iter().map(Argument::value).collect();
        assert_eq!(values, vec!["client-7", "a-b"]);
    }

    #[test]
    fn test_argument_run_with_trailing_space() {
        let (args, last) = scan_arguments("foo ", 0);
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].span(), Span::new(0, 3));
        assert_eq!(last, 3);
    }

    #[test]
    fn test_start_past_end_yields_empty_tokens() {
        let (arg, last) = scan_argument("ab", 5);
        assert_eq!(arg.value(), "");
        assert_eq!(arg.span(), Span::new(5, 5));
        assert_eq!(last, 5);

        let (flag, last) = scan_flag("ab", 5);
        assert_eq!(flag.value(), "");
        assert!(!flag.is_long());
        assert_eq!(flag.span(), Span::new(5, 5));
        assert_eq!(last, 5);

        let (args, last) = scan_arguments("ab", 5);
        assert!(args.is_empty());
        assert_eq!(last, 5);
    }

    #[test]
    fn test_start_inside_multibyte_char_yields_empty_tokens() {
        let (arg, last) = scan_argument("é", 1);
        assert_eq!(arg.value(), "");
        assert_eq!(arg.span(), Span::new(1, 1));
        assert_eq!(last, 1);

        let (flag, last) = scan_flag("-é", 2);
        assert_eq!(flag.value(), "");
        assert_eq!(flag.span(), Span::new(2, 2));
        assert_eq!(last, 2);
    }

    #[test]
    fn test_multibyte_tokens_scan_whole() {
        let (arg, last) = scan_argument("héllo x", 0);
        assert_eq!(arg.value(), "héllo");
        assert_eq!(last, 6);

        let (flag, _) = scan_flag("--naïve", 0);
        assert_eq!(flag.value(), "naïve");
    }
}
