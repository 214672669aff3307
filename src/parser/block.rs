//! Block context: `- item` sequences and `key: value` mappings.
//!
//! A block collection's indentation is the column of its first entry. Each
//! iteration speculatively skips to the next token and stops, restoring the
//! cursor, as soon as that token is not a sibling entry at exactly that
//! column. A dedented line therefore ends the collection instead of failing.

use super::{Parser, Result};
use crate::error::ParseErrorKind;
use crate::node::{Mapping, Node, Value};

impl Parser<'_> {
    /// Sequence of `-` entries at column `indent`.
    pub(super) fn parse_block_sequence(&mut self, indent: usize) -> Result<Node> {
        let mut items = Vec::new();
        loop {
            let mark = self.scanner.mark();
            self.scanner.skip_whitespace_and_comments();
            if self.scanner.at_end()
                || !self.scanner.at(b'-')
                || self.scanner.indent() != indent
                || !self.scanner.separator_at(1)
            {
                self.scanner.reset(mark);
                break;
            }

            self.scanner.advance();
            self.scanner.skip_inline_space();
            items.push(self.parse_block_value(indent)?);
        }
        Ok(Node::new(Value::Sequence(items)))
    }

    /// Mapping of `key: value` entries at column `indent`. Duplicate keys
    /// keep the last value.
    pub(super) fn parse_block_mapping(&mut self, indent: usize) -> Result<Node> {
        let mut map = Mapping::new();
        loop {
            let mark = self.scanner.mark();
            self.scanner.skip_whitespace_and_comments();
            if self.scanner.at_end() || self.scanner.indent() != indent {
                self.scanner.reset(mark);
                break;
            }

            let key = match self.scanner.peek() {
                Some(b'"' | b'\'') => self.parse_quoted()?,
                _ => match self.key_colon_offset() {
                    Some(len) => self.parse_bare_key(len)?,
                    None => {
                        self.scanner.reset(mark);
                        break;
                    }
                },
            };

            self.scanner.skip_inline_space();
            if !self.scanner.at(b':') {
                return Err(self.scanner.error(
                    ParseErrorKind::Structural,
                    format!("Expected ':' after key '{}'", key),
                ));
            }
            self.scanner.advance();
            self.scanner.skip_inline_space();

            let value = self.parse_block_value(indent)?;
            if map.insert(key, value).is_some() {
                log::trace!("duplicate key replaced at line {}", self.scanner.line());
            }
        }
        Ok(Node::new(Value::Mapping(map)))
    }

    /// Value after `- ` or `key:`. Either inline on this line (parsed at the
    /// parent's indentation) or on the next non-blank line, which must be
    /// indented deeper than `indent` to belong to this entry.
    fn parse_block_value(&mut self, indent: usize) -> Result<Node> {
        if self.scanner.at_line_end() {
            return self.parse_next_line_value(indent + 1);
        }
        let node = self.parse_node(indent)?;
        self.scanner.skip_line_end();
        Ok(node)
    }

    /// Consume a bare key of `len` bytes and the blanks before its colon.
    fn parse_bare_key(&mut self, len: usize) -> Result<String> {
        let start = self.scanner.pos();
        let mut raw = self.scanner.input()[start..start + len].to_vec();
        self.scanner.advance_by(len);
        while matches!(raw.last(), Some(b' ' | b'\t')) {
            raw.pop();
        }
        self.bytes_to_string(raw)
    }

    /// Distance from the cursor to the first `:` on this line that is
    /// followed by a separator, ignoring anything after a ` #` comment.
    pub(super) fn key_colon_offset(&self) -> Option<usize> {
        let rest = &self.scanner.input()[self.scanner.pos()..];
        let mut after_blank = false;
        for (i, &b) in rest.iter().enumerate() {
            match b {
                b'\n' | b'\r' => return None,
                b'#' if after_blank => return None,
                b':' if matches!(rest.get(i + 1), None | Some(b' ' | b'\t' | b'\n' | b'\r')) => {
                    return Some(i)
                }
                _ => {}
            }
            after_blank = matches!(b, b' ' | b'\t');
        }
        None
    }
}
