//! Indentation-sensitive recursive-descent parser.
//!
//! # Architecture
//!
//! - [`scanner`] owns the cursor; nothing else touches the raw text.
//! - [`scalar`] lexes plain, quoted and block scalars and types plain ones.
//! - [`flow`] handles bracketed `[...]` / `{...}` collections.
//! - [`block`] handles indentation-delimited sequences and mappings.
//! - [`anchors`] holds the per-document `&name` table consulted by `*name`.
//!
//! [`Parser::parse_node`] is the dispatch point: it reads an optional
//! anchor, resolves an alias, or picks a component from the lookahead
//! character. Block collections use the column of their first entry as
//! their indentation and end at the first line whose entry is elsewhere.

mod anchors;
mod block;
mod flow;
mod scalar;
mod scanner;

pub use scalar::coerce_scalar;
pub(crate) use scalar::is_flow_indicator;

use crate::config::ParseConfig;
use crate::error::{ParseError, ParseErrorKind};
use crate::node::Node;
use anchors::AnchorTable;
use scanner::Scanner;

pub(crate) type Result<T> = core::result::Result<T, ParseError>;

/// Parse a YAML document into a [`Node`] tree using the default
/// configuration.
///
/// # Example
///
/// ```
/// let doc = yamln::parse("name: Alice\ntags: [a, b]").unwrap();
/// assert_eq!(doc.get("name").and_then(|n| n.as_str()), Some("Alice"));
/// assert_eq!(doc.get("tags").and_then(|t| t.as_sequence()).map(Vec::len), Some(2));
/// ```
pub fn parse(text: &str) -> Result<Node> {
    parse_with_config(text, &ParseConfig::default())
}

/// Parse a YAML document with an explicit configuration.
pub fn parse_with_config(text: &str, config: &ParseConfig) -> Result<Node> {
    Parser::new(text, config.clone()).parse_document()
}

pub(crate) struct Parser<'a> {
    scanner: Scanner<'a>,
    anchors: AnchorTable,
    config: ParseConfig,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str, config: ParseConfig) -> Self {
        Self {
            scanner: Scanner::new(input),
            anchors: AnchorTable::new(),
            config,
            depth: 0,
        }
    }

    /// Parse exactly one root node, framed by optional `---` and `...`
    /// markers.
    pub(crate) fn parse_document(&mut self) -> Result<Node> {
        log::debug!(
            "parsing document ({} bytes, max depth {})",
            self.scanner.input().len(),
            self.config.max_depth
        );

        self.skip_document_start();
        let root = if self.at_document_end() {
            Node::null()
        } else {
            self.parse_node(0)?
        };

        self.scanner.skip_whitespace_and_comments();
        if self.at_document_end() {
            self.scanner.advance_by(3);
            self.scanner.skip_whitespace_and_comments();
        }
        if !self.scanner.at_end() {
            log::warn!(
                "ignoring content after document root at line {}, col {}",
                self.scanner.line(),
                self.scanner.column()
            );
        }

        log::debug!(
            "parsed {} root ({} anchors)",
            root.type_name(),
            self.anchors.len()
        );
        Ok(root)
    }

    /// Leading blank lines, comments, and a `---` line (its remainder is
    /// discarded).
    fn skip_document_start(&mut self) {
        self.scanner.skip_whitespace_and_comments();
        if self.scanner.starts_with(b"---") && self.scanner.separator_at(3) {
            self.scanner.advance_by(3);
            self.scanner.skip_to_eol();
            self.scanner.skip_whitespace_and_comments();
        }
    }

    fn at_document_end(&self) -> bool {
        self.scanner.starts_with(b"...") && self.scanner.separator_at(3)
    }

    /// Run `f` one nesting level deeper, failing once the configured depth
    /// is exhausted.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.config.max_depth {
            return Err(self.scanner.error(
                ParseErrorKind::Structural,
                format!(
                    "maximum nesting depth of {} exceeded",
                    self.config.max_depth
                ),
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Parse any node whose structural indentation is `indent`.
    pub(super) fn parse_node(&mut self, indent: usize) -> Result<Node> {
        self.nested(|p| p.dispatch_node(indent))
    }

    fn dispatch_node(&mut self, indent: usize) -> Result<Node> {
        self.scanner.skip_inline_space();

        let anchor = self.parse_anchor_prefix()?;
        if self.scanner.at(b'*') {
            return self.parse_alias();
        }

        let node = match self.scanner.peek() {
            None => Node::null(),
            Some(b'\n' | b'\r' | b'#') => match anchor {
                // A document-level anchor may own a container at column 0.
                Some(_) if self.depth == 1 => self.parse_next_line_value(indent)?,
                Some(_) => self.parse_next_line_value(indent + 1)?,
                None => Node::null(),
            },
            Some(b'[') => self.parse_flow_sequence()?,
            Some(b'{') => self.parse_flow_mapping()?,
            Some(b'"' | b'\'') => {
                if self.quoted_key_ahead() {
                    log::trace!("block mapping with quoted key at line {}", self.scanner.line());
                    self.parse_block_mapping(self.scanner.indent())?
                } else {
                    Node::string(self.parse_quoted()?)
                }
            }
            Some(b'|' | b'>') => Node::string(self.parse_block_scalar(indent)?),
            Some(b'-') if self.scanner.separator_at(1) => {
                log::trace!("block sequence at line {}", self.scanner.line());
                self.parse_block_sequence(self.scanner.indent())?
            }
            Some(_) => {
                if self.key_colon_offset().is_some() {
                    log::trace!("block mapping at line {}", self.scanner.line());
                    self.parse_block_mapping(self.scanner.indent())?
                } else {
                    let text = self.parse_plain_scalar()?;
                    Node::new(coerce_scalar(&text))
                }
            }
        };

        Ok(self.bind_anchor(anchor, node))
    }

    /// `&name` and the blanks after it, if the cursor is on a `&`.
    fn parse_anchor_prefix(&mut self) -> Result<Option<String>> {
        if !self.scanner.at(b'&') {
            return Ok(None);
        }
        self.scanner.advance();
        let name = self.parse_anchor_name()?;
        self.scanner.skip_inline_space();
        Ok(Some(name))
    }

    /// Attach `anchor` to the finished node and make it visible to later
    /// aliases.
    fn bind_anchor(&mut self, anchor: Option<String>, mut node: Node) -> Node {
        if let Some(name) = anchor {
            node.anchor = Some(name.clone());
            self.anchors.define(&name, &node);
        }
        node
    }

    /// The value of an entry whose line ended after its indicator: the next
    /// non-blank line if it starts at `min_column` or deeper, otherwise null
    /// (and nothing is consumed past the current line).
    fn parse_next_line_value(&mut self, min_column: usize) -> Result<Node> {
        self.scanner.skip_line_end();
        let mark = self.scanner.mark();
        self.scanner.skip_whitespace_and_comments();

        let column = self.scanner.indent();
        if self.scanner.at_end() || column < min_column {
            self.scanner.reset(mark);
            return Ok(Node::null());
        }
        self.parse_node(column)
    }

    /// `*name`, cursor on the `*`. The anchor must already be defined.
    fn parse_alias(&mut self) -> Result<Node> {
        let start = self.scanner.mark();
        self.scanner.advance();
        let name = self.parse_anchor_name()?;

        match self.anchors.resolve(&name) {
            Some(target) => {
                log::trace!("alias *{} resolved", name);
                Ok(Node::alias(target))
            }
            None => Err(self.scanner.error_at(
                start,
                ParseErrorKind::Reference,
                format!("Unknown alias: *{}", name),
            )),
        }
    }

    /// True if the quoted scalar at the cursor is followed by `:` and a
    /// separator, i.e. it is a mapping key. Never moves the cursor.
    fn quoted_key_ahead(&mut self) -> bool {
        let mark = self.scanner.mark();
        let is_key = self.parse_quoted().is_ok() && {
            self.scanner.skip_inline_space();
            self.scanner.at(b':') && self.scanner.separator_at(1)
        };
        self.scanner.reset(mark);
        is_key
    }
}
