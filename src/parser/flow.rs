//! Flow context: `[a, b]` sequences and `{k: v}` mappings.
//!
//! Indentation is irrelevant inside brackets; whitespace, line breaks and
//! comments may appear between any two tokens.

use super::{Parser, Result};
use crate::error::ParseErrorKind;
use crate::node::{Mapping, Node, Value};
use crate::parser::scalar::coerce_scalar;

impl Parser<'_> {
    /// One flow element, one nesting level below its container: an optional
    /// `&anchor`, then a nested container, a quoted scalar, an alias, or a
    /// plain scalar running up to `,` `]` `}` or the end of the line.
    pub(super) fn parse_flow_node(&mut self) -> Result<Node> {
        self.nested(|p| {
            p.scanner.skip_inline_space();
            let anchor = p.parse_anchor_prefix()?;
            if p.scanner.at(b'*') {
                return p.parse_alias();
            }
            let node = p.parse_flow_content()?;
            Ok(p.bind_anchor(anchor, node))
        })
    }

    fn parse_flow_content(&mut self) -> Result<Node> {
        match self.scanner.peek() {
            None => Ok(Node::null()),
            Some(b'[') => self.parse_flow_sequence(),
            Some(b'{') => self.parse_flow_mapping(),
            Some(b'"' | b'\'') => Ok(Node::string(self.parse_quoted()?)),
            Some(_) => {
                let mut buf = Vec::new();
                while let Some(b) = self.scanner.peek() {
                    if matches!(b, b',' | b']' | b'}' | b'\n' | b'\r') {
                        break;
                    }
                    if b == b'#' && matches!(buf.last(), None | Some(b' ' | b'\t')) {
                        break;
                    }
                    buf.push(b);
                    self.scanner.advance();
                }
                while matches!(buf.last(), Some(b' ' | b'\t')) {
                    buf.pop();
                }
                let text = self.bytes_to_string(buf)?;
                Ok(Node::new(coerce_scalar(&text)))
            }
        }
    }

    /// `[ ... ]`, cursor on the `[`.
    pub(super) fn parse_flow_sequence(&mut self) -> Result<Node> {
        let start = self.scanner.mark();
        self.scanner.advance();

        let mut items = Vec::new();
        self.scanner.skip_whitespace_and_comments();
        while !self.scanner.at_end() && !self.scanner.at(b']') {
            items.push(self.parse_flow_node()?);
            self.finish_flow_entry(b']')?;
        }
        if self.scanner.at_end() {
            return Err(self.scanner.error_at(
                start,
                ParseErrorKind::Lex,
                "Unterminated flow sequence",
            ));
        }
        self.scanner.advance();
        Ok(Node::new(Value::Sequence(items)))
    }

    /// `{ ... }`, cursor on the `{`. Keys are quoted or a bare run up to `:`.
    pub(super) fn parse_flow_mapping(&mut self) -> Result<Node> {
        let start = self.scanner.mark();
        self.scanner.advance();

        let mut map = Mapping::new();
        self.scanner.skip_whitespace_and_comments();
        while !self.scanner.at_end() && !self.scanner.at(b'}') {
            let key = match self.scanner.peek() {
                Some(b'"' | b'\'') => self.parse_quoted()?,
                _ => {
                    let mut buf = Vec::new();
                    while let Some(b) = self.scanner.peek() {
                        if matches!(b, b':' | b'}' | b'\n') {
                            break;
                        }
                        buf.push(b);
                        self.scanner.advance();
                    }
                    while matches!(buf.last(), Some(b' ' | b'\t' | b'\r')) {
                        buf.pop();
                    }
                    self.bytes_to_string(buf)?
                }
            };

            self.scanner.skip_inline_space();
            if !self.scanner.at(b':') {
                if self.scanner.at_end() {
                    break;
                }
                return Err(self
                    .scanner
                    .error(ParseErrorKind::Structural, "Expected ':' in flow mapping"));
            }
            self.scanner.advance();
            self.scanner.skip_inline_space();

            let value = self.parse_flow_node()?;
            map.insert(key, value);
            self.finish_flow_entry(b'}')?;
        }
        if self.scanner.at_end() {
            return Err(self.scanner.error_at(
                start,
                ParseErrorKind::Lex,
                "Unterminated flow mapping",
            ));
        }
        self.scanner.advance();
        Ok(Node::new(Value::Mapping(map)))
    }

    /// After an element: consume a `,` if present. Anything other than the
    /// separator, the closing bracket or the end of input is an error.
    fn finish_flow_entry(&mut self, close: u8) -> Result<()> {
        self.scanner.skip_whitespace_and_comments();
        match self.scanner.peek() {
            Some(b',') => {
                self.scanner.advance();
                self.scanner.skip_whitespace_and_comments();
                Ok(())
            }
            Some(b) if b == close => Ok(()),
            None => Ok(()),
            Some(b) => Err(self.scanner.error(
                ParseErrorKind::Structural,
                format!(
                    "Expected ',' or '{}' in flow collection, found '{}'",
                    close as char,
                    char::from(b)
                ),
            )),
        }
    }
}
