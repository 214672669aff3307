//! Scalar lexing: plain, quoted and block scalars, anchor names, and the
//! coercion of plain scalar text to typed values.

use super::{Parser, Result};
use crate::error::ParseErrorKind;
use crate::node::Value;

/// Trailing line-break handling for block scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomp {
    /// `-`: drop all trailing newlines
    Strip,
    /// `+`: keep trailing blank lines
    Keep,
    /// default: exactly one trailing newline
    Clip,
}

impl Parser<'_> {
    /// Plain scalar in block context. Stops at `: `, ` #`, a line break, or
    /// a flow indicator; trailing blanks are trimmed.
    pub(super) fn parse_plain_scalar(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        while let Some(b) = self.scanner.peek() {
            match b {
                b':' if self.scanner.separator_at(1) => break,
                b'#' if matches!(buf.last(), Some(b' ' | b'\t')) => break,
                b'\n' | b'\r' | b',' | b'}' | b']' => break,
                _ => {
                    buf.push(b);
                    self.scanner.advance();
                }
            }
        }
        trim_trailing_blanks(&mut buf);
        self.bytes_to_string(buf)
    }

    /// Double-quoted scalar, cursor on the opening `"`.
    ///
    /// Recognized escapes are `\n \t \r \" \\ \0`; any other `\x` is kept
    /// verbatim as a backslash followed by `x`.
    pub(super) fn parse_double_quoted(&mut self) -> Result<String> {
        let start = self.scanner.mark();
        self.scanner.advance();

        let mut buf = Vec::new();
        loop {
            match self.scanner.advance() {
                None => {
                    return Err(self.scanner.error_at(
                        start,
                        ParseErrorKind::Lex,
                        "Unterminated double-quoted string",
                    ))
                }
                Some(b'"') => break,
                Some(b'\\') => match self.scanner.advance() {
                    None => {
                        return Err(self
                            .scanner
                            .error(ParseErrorKind::Lex, "Unterminated escape sequence"))
                    }
                    Some(b'n') => buf.push(b'\n'),
                    Some(b't') => buf.push(b'\t'),
                    Some(b'r') => buf.push(b'\r'),
                    Some(b'"') => buf.push(b'"'),
                    Some(b'\\') => buf.push(b'\\'),
                    Some(b'0') => buf.push(0),
                    Some(other) => {
                        buf.push(b'\\');
                        buf.push(other);
                    }
                },
                Some(b) => buf.push(b),
            }
        }
        self.bytes_to_string(buf)
    }

    /// Single-quoted scalar, cursor on the opening `'`. `''` is a literal
    /// quote; there are no other escapes.
    pub(super) fn parse_single_quoted(&mut self) -> Result<String> {
        let start = self.scanner.mark();
        self.scanner.advance();

        let mut buf = Vec::new();
        loop {
            match self.scanner.advance() {
                None => {
                    return Err(self.scanner.error_at(
                        start,
                        ParseErrorKind::Lex,
                        "Unterminated single-quoted string",
                    ))
                }
                Some(b'\'') if self.scanner.at(b'\'') => {
                    self.scanner.advance();
                    buf.push(b'\'');
                }
                Some(b'\'') => break,
                Some(b) => buf.push(b),
            }
        }
        self.bytes_to_string(buf)
    }

    /// Quoted scalar of either style, cursor on the opening quote.
    pub(super) fn parse_quoted(&mut self) -> Result<String> {
        if self.scanner.at(b'\'') {
            self.parse_single_quoted()
        } else {
            self.parse_double_quoted()
        }
    }

    /// Literal (`|`) or folded (`>`) block scalar, cursor on the indicator.
    ///
    /// Content indentation is taken from the first non-blank line, which must
    /// be indented deeper than `parent_indent`; explicit indentation digits
    /// are accepted and ignored. Blank lines are held back until more content
    /// follows so that trailing ones are subject to chomping.
    pub(super) fn parse_block_scalar(&mut self, parent_indent: usize) -> Result<String> {
        let folded = self.scanner.advance() == Some(b'>');

        let mut chomp = Chomp::Clip;
        loop {
            match self.scanner.peek() {
                Some(b'-') => chomp = Chomp::Strip,
                Some(b'+') => chomp = Chomp::Keep,
                Some(b) if b.is_ascii_digit() => {}
                _ => break,
            }
            self.scanner.advance();
        }
        self.scanner.skip_line_end();

        let mut block_indent = None;
        let mut text: Vec<u8> = Vec::new();
        let mut pending_newlines = 0usize;

        while !self.scanner.at_end() {
            let indent = self.scanner.current_indent();
            if matches!(self.scanner.peek_at(indent), None | Some(b'\n' | b'\r')) {
                self.scanner.skip_to_eol();
                self.scanner.advance();
                pending_newlines += 1;
                continue;
            }

            let content_indent = match block_indent {
                Some(n) => n,
                None if indent <= parent_indent => break,
                None => {
                    block_indent = Some(indent);
                    indent
                }
            };
            if indent < content_indent {
                break;
            }

            text.extend(std::iter::repeat(b'\n').take(pending_newlines));
            pending_newlines = 0;

            self.scanner.advance_by(content_indent);
            let mut line = Vec::new();
            while let Some(b) = self.scanner.peek() {
                if b == b'\n' || b == b'\r' {
                    break;
                }
                line.push(b);
                self.scanner.advance();
            }
            self.scanner.skip_line_end();

            if folded {
                if !text.is_empty() && text.last() != Some(&b'\n') {
                    text.push(b' ');
                }
                text.extend_from_slice(&line);
            } else {
                text.extend_from_slice(&line);
                text.push(b'\n');
            }
        }

        match chomp {
            Chomp::Strip => trim_trailing_newlines(&mut text),
            Chomp::Keep => text.extend(std::iter::repeat(b'\n').take(pending_newlines)),
            Chomp::Clip => {
                trim_trailing_newlines(&mut text);
                text.push(b'\n');
            }
        }
        self.bytes_to_string(text)
    }

    /// Anchor or alias name, cursor just past the `&` or `*`. Runs up to
    /// whitespace or a flow indicator and must not be empty.
    pub(super) fn parse_anchor_name(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        while let Some(b) = self.scanner.peek() {
            if b.is_ascii_whitespace() || is_flow_indicator(b) {
                break;
            }
            buf.push(b);
            self.scanner.advance();
        }
        if buf.is_empty() {
            return Err(self
                .scanner
                .error(ParseErrorKind::Lex, "Empty anchor/alias name"));
        }
        self.bytes_to_string(buf)
    }

    /// Scalar bytes are always cut at ASCII delimiters of a `&str`, so this
    /// only fails on a broken invariant.
    pub(super) fn bytes_to_string(&self, bytes: Vec<u8>) -> Result<String> {
        String::from_utf8(bytes)
            .map_err(|_| self.scanner.error(ParseErrorKind::Lex, "invalid UTF-8 in scalar"))
    }
}

/// `,` `[` `]` `{` `}`
#[inline]
pub(crate) fn is_flow_indicator(b: u8) -> bool {
    matches!(b, b',' | b'[' | b']' | b'{' | b'}')
}

fn trim_trailing_blanks(buf: &mut Vec<u8>) {
    while matches!(buf.last(), Some(b' ' | b'\t')) {
        buf.pop();
    }
}

fn trim_trailing_newlines(buf: &mut Vec<u8>) {
    while buf.last() == Some(&b'\n') {
        buf.pop();
    }
}

/// Type a plain scalar.
///
/// In priority order: empty, `~` or `null` is null; `true`/`True`/`TRUE`
/// and the `false` spellings are booleans; an optional sign followed by
/// digits is an integer if it fits in `i64`; anything that parses entirely
/// as a float is a float; everything else stays a string.
pub fn coerce_scalar(s: &str) -> Value {
    match s {
        "" | "~" | "null" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }

    if is_integer_literal(s) {
        if let Ok(n) = s.parse::<i64>() {
            return Value::Int(n);
        }
    }

    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }

    Value::String(s.to_string())
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseConfig;

    fn parser(input: &str) -> Parser<'_> {
        Parser::new(input, ParseConfig::default())
    }

    #[test]
    fn test_coerce_null_and_bool() {
        assert_eq!(coerce_scalar(""), Value::Null);
        assert_eq!(coerce_scalar("~"), Value::Null);
        assert_eq!(coerce_scalar("null"), Value::Null);
        assert_eq!(coerce_scalar("True"), Value::Bool(true));
        assert_eq!(coerce_scalar("TRUE"), Value::Bool(true));
        assert_eq!(coerce_scalar("false"), Value::Bool(false));
        assert_eq!(coerce_scalar("yes"), Value::String("yes".into()));
        assert_eq!(coerce_scalar("NULL"), Value::String("NULL".into()));
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(coerce_scalar("42"), Value::Int(42));
        assert_eq!(coerce_scalar("-7"), Value::Int(-7));
        assert_eq!(coerce_scalar("+7"), Value::Int(7));
        assert_eq!(coerce_scalar("3.14"), Value::Float(3.14));
        assert_eq!(coerce_scalar("1e3"), Value::Float(1000.0));
        assert_eq!(
            coerce_scalar("99999999999999999999"),
            Value::Float(99999999999999999999.0)
        );
        assert_eq!(coerce_scalar("42abc"), Value::String("42abc".into()));
        assert_eq!(coerce_scalar("-"), Value::String("-".into()));
    }

    #[test]
    fn test_plain_scalar_terminators() {
        let mut p = parser("hello world: rest");
        assert_eq!(p.parse_plain_scalar().unwrap(), "hello world");

        let mut p = parser("a#b # comment");
        assert_eq!(p.parse_plain_scalar().unwrap(), "a#b");

        let mut p = parser("http://x.y/z, next");
        assert_eq!(p.parse_plain_scalar().unwrap(), "http://x.y/z");
    }

    #[test]
    fn test_double_quoted_escapes() {
        let mut p = parser(r#""a\nb\t\"q\"\\\0\x""#);
        assert_eq!(p.parse_double_quoted().unwrap(), "a\nb\t\"q\"\\\0\\x");
    }

    #[test]
    fn test_unterminated_quotes() {
        let err = parser("\"abc").parse_double_quoted().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Lex);
        assert_eq!((err.line, err.column), (1, 1));

        let err = parser("'abc").parse_single_quoted().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Lex);
    }

    #[test]
    fn test_single_quoted_doubled_quote() {
        let mut p = parser("'it''s' tail");
        assert_eq!(p.parse_single_quoted().unwrap(), "it's");
        assert!(p.scanner.at(b' '));
    }

    #[test]
    fn test_block_scalar_chomping() {
        let body = "\n  line1\n  line2\n\n";
        let cases = [
            ("|-", "line1\nline2"),
            ("|+", "line1\nline2\n\n"),
            ("|", "line1\nline2\n"),
        ];
        for (header, expected) in cases {
            let text = format!("{}{}", header, body);
            let mut p = parser(&text);
            assert_eq!(p.parse_block_scalar(0).unwrap(), expected, "header {}", header);
        }
    }

    #[test]
    fn test_folded_block_scalar() {
        let mut p = parser(">\n  one\n  two\n\n  three\nnext: 1");
        assert_eq!(p.parse_block_scalar(0).unwrap(), "one two\nthree\n");
        assert!(p.scanner.at(b'n'));
    }

    #[test]
    fn test_block_scalar_keeps_deeper_indentation() {
        let mut p = parser("|2 # comment\n  a\n    b\n  c\n");
        assert_eq!(p.parse_block_scalar(0).unwrap(), "a\n  b\nc\n");
    }

    #[test]
    fn test_anchor_name() {
        let mut p = parser("name rest");
        assert_eq!(p.parse_anchor_name().unwrap(), "name");

        let mut p = parser("x]");
        assert_eq!(p.parse_anchor_name().unwrap(), "x");

        let err = parser(" value").parse_anchor_name().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Lex);
    }
}
