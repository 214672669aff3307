//! Cursor over the source text with line/column tracking.
//!
//! Everything above this module reads the input only through [`Scanner`].
//! Speculative lookahead takes a [`Mark`] and restores it on failure so
//! position, line and column always move together.

use crate::error::{ParseError, ParseErrorKind};

/// Saved cursor state for backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

pub(crate) struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Snapshot the cursor.
    #[inline]
    pub(crate) fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    /// Restore a snapshot taken with [`mark`](Self::mark).
    #[inline]
    pub(crate) fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.line = mark.line;
        self.column = mark.column;
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub(crate) fn column(&self) -> usize {
        self.column
    }

    /// Column of the cursor as an indentation level (0-based).
    #[inline]
    pub(crate) fn indent(&self) -> usize {
        self.column - 1
    }

    /// Raw bytes, for scans that must not move the cursor.
    #[inline]
    pub(crate) fn input(&self) -> &'a [u8] {
        self.input
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Byte at `offset` past the cursor, `None` past the end of input.
    #[inline]
    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// True if the cursor is at `b`.
    #[inline]
    pub(crate) fn at(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    /// True if the byte at `offset` is a space, tab, line break or the end
    /// of input.
    #[inline]
    pub(crate) fn separator_at(&self, offset: usize) -> bool {
        matches!(
            self.peek_at(offset),
            None | Some(b' ' | b'\t' | b'\n' | b'\r')
        )
    }

    /// True if the input at the cursor starts with `s`.
    pub(crate) fn starts_with(&self, s: &[u8]) -> bool {
        self.input[self.pos.min(self.input.len())..].starts_with(s)
    }

    /// Consume one byte. Columns count characters, so UTF-8 continuation
    /// bytes do not advance the column.
    pub(crate) fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else if b & 0xC0 != 0x80 {
            self.column += 1;
        }
        Some(b)
    }

    /// Consume `n` bytes (stops early at end of input).
    pub(crate) fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Consume spaces and tabs.
    pub(crate) fn skip_inline_space(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t')) {
            self.advance();
        }
    }

    /// Consume up to (not including) the next newline.
    pub(crate) fn skip_to_eol(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.advance();
        }
    }

    /// Consume all whitespace, line breaks and `#` comments.
    pub(crate) fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.advance();
                }
                b'#' => self.skip_to_eol(),
                _ => break,
            }
        }
    }

    /// Consume spaces, tabs and a trailing comment on the current line,
    /// stopping at the line break.
    pub(crate) fn skip_inline_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' => {
                    self.advance();
                }
                b'#' => {
                    self.skip_to_eol();
                    break;
                }
                _ => break,
            }
        }
    }

    /// Finish the current line: trailing blanks, comment and the line break.
    pub(crate) fn skip_line_end(&mut self) {
        self.skip_inline_whitespace_and_comments();
        if self.at(b'\r') {
            self.advance();
        }
        if self.at(b'\n') {
            self.advance();
        }
    }

    /// Number of spaces at the cursor, without consuming them.
    pub(crate) fn current_indent(&self) -> usize {
        self.input[self.pos.min(self.input.len())..]
            .iter()
            .take_while(|&&b| b == b' ')
            .count()
    }

    /// True if nothing but blanks or a comment remains on this line.
    pub(crate) fn at_line_end(&self) -> bool {
        for &b in &self.input[self.pos.min(self.input.len())..] {
            match b {
                b' ' | b'\t' => continue,
                b'\n' | b'\r' | b'#' => return true,
                _ => return false,
            }
        }
        true
    }

    /// Build an error at the cursor.
    pub(crate) fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(kind, message, self.line, self.column)
    }

    /// Build an error at a saved position.
    pub(crate) fn error_at(
        &self,
        mark: Mark,
        kind: ParseErrorKind,
        message: impl Into<String>,
    ) -> ParseError {
        ParseError::new(kind, message, mark.line, mark.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_line_and_column() {
        let mut s = Scanner::new("ab\ncd");
        assert_eq!((s.line(), s.column()), (1, 1));
        assert_eq!(s.advance(), Some(b'a'));
        assert_eq!((s.line(), s.column()), (1, 2));
        s.advance();
        s.advance();
        assert_eq!((s.line(), s.column()), (2, 1));
        s.advance_by(10);
        assert!(s.at_end());
        assert_eq!(s.advance(), None);
        assert_eq!(s.peek(), None);
    }

    #[test]
    fn test_columns_count_characters() {
        let mut s = Scanner::new("é: x");
        s.advance_by(2);
        assert_eq!(s.column(), 2);
        assert!(s.at(b':'));
    }

    #[test]
    fn test_mark_and_reset() {
        let mut s = Scanner::new("# c\n\n  key");
        let mark = s.mark();
        s.skip_whitespace_and_comments();
        assert_eq!((s.line(), s.column()), (3, 3));
        assert!(s.at(b'k'));
        s.reset(mark);
        assert_eq!((s.pos(), s.line(), s.column()), (0, 1, 1));
    }

    #[test]
    fn test_inline_skips_stop_at_newline() {
        let mut s = Scanner::new("  # note\nnext");
        s.skip_inline_whitespace_and_comments();
        assert!(s.at(b'\n'));

        let mut s = Scanner::new(" \t x");
        s.skip_inline_space();
        assert!(s.at(b'x'));

        let mut s = Scanner::new("abc\ndef");
        s.skip_to_eol();
        assert!(s.at(b'\n'));
    }

    #[test]
    fn test_skip_line_end() {
        let mut s = Scanner::new("  # trailing\r\nnext");
        s.skip_line_end();
        assert!(s.at(b'n'));
        assert_eq!(s.line(), 2);
    }

    #[test]
    fn test_current_indent_and_line_end() {
        let s = Scanner::new("    x");
        assert_eq!(s.current_indent(), 4);
        assert!(!s.at_line_end());
        assert!(Scanner::new("   # c").at_line_end());
        assert!(Scanner::new("").at_line_end());
    }

    #[test]
    fn test_separator_at() {
        let s = Scanner::new("- a");
        assert!(s.separator_at(1));
        assert!(!s.separator_at(2));
        assert!(s.separator_at(3));
    }
}
