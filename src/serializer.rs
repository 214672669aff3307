//! Canonical YAML emitter.
//!
//! Output rules:
//!
//! - Scalars: `null`, `true`/`false`, decimal numbers, and double-quoted
//!   strings. Floats always carry a `.`, an exponent or a special name so
//!   they read back as floats.
//! - Empty collections are written inline as `[]` and `{}`.
//! - Non-empty collections get one entry per line, nested collections two
//!   spaces deeper than their parent.
//! - Anchors are written as `&name` in front of the node they are bound to;
//!   aliases as `*name` of their referent, never ahead of that `&name`.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::error::SerializeError;
use crate::node::{Node, NodeRef, Value};
use crate::parser::is_flow_indicator;

type Result<T> = core::result::Result<T, SerializeError>;

/// Render `node` as canonical YAML text.
///
/// Mapping keys are written in sorted order, so an alias may come before the
/// node that carries its anchor. In that case the alias target is written in
/// full, anchored, at the alias, and the later anchored node becomes `*name`.
/// Every `*name` in the output therefore follows its `&name`.
///
/// # Example
///
/// ```
/// use yamln::Node;
///
/// let doc = Node::mapping([("b", Node::int(2)), ("a", Node::from(vec![1i64]))]);
/// assert_eq!(yamln::serialize(&doc).unwrap(), "a:\n  - 1\nb: 2");
/// ```
pub fn serialize(node: &Node) -> Result<String> {
    let mut emitter = Emitter::default();
    emitter.write_node(node, 0, true)?;
    Ok(emitter.out)
}

/// Content an anchor name stands for at the current point of the output.
#[derive(Debug)]
struct Binding {
    value: Value,
    /// Set when the content was written in place of an alias to `target`
    target: Option<NodeRef>,
}

#[derive(Debug, Default)]
struct Emitter {
    out: String,
    anchors: HashMap<String, Binding>,
}

impl Emitter {
    /// `node` at the document root (`root`) or after `-` / `key:` of an entry
    /// at `indent`.
    fn write_node(&mut self, node: &Node, indent: usize, root: bool) -> Result<()> {
        if let Value::Alias(target) = &node.value {
            return self.write_alias(target, indent, root);
        }

        let name = match node.anchor.as_deref() {
            Some(name) => check_anchor_name(name)?,
            None => return self.write_anchored(None, node, indent, root),
        };

        // Already written in full for an earlier alias.
        let written = self
            .anchors
            .get(name)
            .is_some_and(|b| b.target.is_some() && b.value == node.value);
        if written {
            self.write_reference(name, root);
            return Ok(());
        }

        self.write_anchored(Some(name), node, indent, root)?;
        self.anchors.insert(
            name.to_string(),
            Binding {
                value: node.value.clone(),
                target: None,
            },
        );
        Ok(())
    }

    /// `*name` if the anchor is already in the output with the same content,
    /// otherwise the target itself under its anchor.
    fn write_alias(&mut self, target: &NodeRef, indent: usize, root: bool) -> Result<()> {
        let guard = target.read();
        if let Value::Alias(inner) = &guard.value {
            // Alias tokens carry no anchor, so follow through to the real node.
            let inner = Arc::clone(inner);
            drop(guard);
            return self.write_alias(&inner, indent, root);
        }

        let name = guard
            .anchor
            .as_deref()
            .ok_or(SerializeError::UnanchoredAlias)?;
        let name = check_anchor_name(name)?.to_string();

        let bound = self.anchors.get(&name).is_some_and(|b| {
            b.target.as_ref().is_some_and(|t| Arc::ptr_eq(t, target)) || b.value == guard.value
        });
        if bound {
            drop(guard);
            self.write_reference(&name, root);
            return Ok(());
        }

        let content = Node::clone(&guard);
        drop(guard);
        log::trace!("alias *{} written ahead of its anchor", name);
        self.write_anchored(Some(&name), &content, indent, root)?;
        self.anchors.insert(
            name,
            Binding {
                value: content.value,
                target: Some(Arc::clone(target)),
            },
        );
        Ok(())
    }

    fn write_reference(&mut self, name: &str, root: bool) {
        if !root {
            self.out.push(' ');
        }
        self.out.push('*');
        self.out.push_str(name);
    }

    /// Optional `&name`, then the inline value or a newline and the nested
    /// block. `node` is never an alias here.
    fn write_anchored(
        &mut self,
        anchor: Option<&str>,
        node: &Node,
        indent: usize,
        root: bool,
    ) -> Result<()> {
        let inline = is_inline(node);
        if let Some(name) = anchor {
            if !root {
                self.out.push(' ');
            }
            self.out.push('&');
            self.out.push_str(name);
            if root && !inline {
                self.out.push('\n');
            }
        }

        if inline {
            if !root || anchor.is_some() {
                self.out.push(' ');
            }
            self.write_inline(&node.value);
            Ok(())
        } else if root {
            self.write_block(node, 0)
        } else {
            self.out.push('\n');
            self.write_block(node, indent + 2)
        }
    }

    fn write_inline(&mut self, value: &Value) {
        let out = &mut self.out;
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Int(n) => {
                let _ = write!(out, "{}", n);
            }
            Value::Float(f) => write_float(out, *f),
            Value::String(s) => write_quoted(out, s),
            Value::Sequence(_) => out.push_str("[]"),
            Value::Mapping(_) => out.push_str("{}"),
            // Written by `write_alias`.
            Value::Alias(_) => {}
        }
    }

    /// Non-empty collection at `indent`, entries separated by newlines and no
    /// trailing newline.
    fn write_block(&mut self, node: &Node, indent: usize) -> Result<()> {
        match &node.value {
            Value::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.start_entry(indent, i);
                    self.out.push('-');
                    self.write_node(item, indent, false)?;
                }
            }
            Value::Mapping(map) => {
                for (i, (key, value)) in map.iter().enumerate() {
                    self.start_entry(indent, i);
                    write_key(&mut self.out, key);
                    self.out.push(':');
                    self.write_node(value, indent, false)?;
                }
            }
            value => self.write_inline(value),
        }
        Ok(())
    }

    fn start_entry(&mut self, indent: usize, index: usize) {
        if index > 0 {
            self.out.push('\n');
        }
        self.out.extend(std::iter::repeat(' ').take(indent));
    }
}

/// Scalars and empty collections fit on the line of their key or dash.
fn is_inline(node: &Node) -> bool {
    match &node.value {
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        _ => true,
    }
}

fn check_anchor_name(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| !b.is_ascii_whitespace() && !is_flow_indicator(b));
    if valid {
        Ok(name)
    } else {
        Err(SerializeError::InvalidAnchorName(name.to_string()))
    }
}

/// Keys stay bare when they start with an ASCII letter or `_` and continue
/// with ASCII alphanumerics, `_` or `-`; everything else is quoted.
fn write_key(out: &mut String, key: &str) {
    let mut bytes = key.bytes();
    let bare = matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if bare {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// `Debug` formatting of `f64` is the shortest text that reads back to the
/// same value and keeps a `.0` on integral values.
fn write_float(out: &mut String, f: f64) {
    let _ = write!(out, "{:?}", f);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(serialize(&Node::null()).unwrap(), "null");
        assert_eq!(serialize(&Node::bool(false)).unwrap(), "false");
        assert_eq!(serialize(&Node::int(-12)).unwrap(), "-12");
        assert_eq!(serialize(&Node::float(3.0)).unwrap(), "3.0");
        assert_eq!(serialize(&Node::float(0.1)).unwrap(), "0.1");
        assert_eq!(serialize(&Node::float(1e300)).unwrap(), "1e300");
        assert_eq!(serialize(&Node::string("42")).unwrap(), "\"42\"");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            serialize(&Node::string("a\"b\\c\nd\te\r\0")).unwrap(),
            r#""a\"b\\c\nd\te\r\0""#
        );
        assert_eq!(serialize(&Node::string("héllo")).unwrap(), "\"héllo\"");
    }

    #[test]
    fn test_key_quoting() {
        let mut out = String::new();
        write_key(&mut out, "plain_key-1");
        out.push(' ');
        write_key(&mut out, "1st");
        out.push(' ');
        write_key(&mut out, "");
        out.push(' ');
        write_key(&mut out, "has space");
        out.push(' ');
        write_key(&mut out, "_x");
        assert_eq!(out, r#"plain_key-1 "1st" "" "has space" _x"#);
    }

    #[test]
    fn test_empty_collections_inline() {
        assert_eq!(serialize(&Node::sequence(Vec::new())).unwrap(), "[]");
        let doc = Node::mapping([
            ("a", Node::sequence(Vec::new())),
            ("b", Node::mapping(Vec::<(String, Node)>::new()).with_anchor("e")),
        ]);
        assert_eq!(serialize(&doc).unwrap(), "a: []\nb: &e {}");
    }

    #[test]
    fn test_anchors_and_aliases() {
        let target = Node::from(vec![1i64, 2]).with_anchor("nums");
        let doc = Node::mapping([
            ("a", target.clone()),
            ("b", Node::alias(target.into_ref())),
        ]);
        assert_eq!(serialize(&doc).unwrap(), "a: &nums\n  - 1\n  - 2\nb: *nums");
    }

    #[test]
    fn test_alias_sorted_before_its_anchor() {
        let target = Node::int(1).with_anchor("z");
        let doc = Node::mapping([
            ("zeta", target.clone()),
            ("alpha", Node::alias(target.into_ref())),
        ]);
        assert_eq!(serialize(&doc).unwrap(), "alpha: &z 1\nzeta: *z");
    }

    #[test]
    fn test_alias_ahead_of_nested_anchors() {
        let inner = Node::int(7).with_anchor("i");
        let outer = Node::mapping([("k", inner.clone())]).with_anchor("o");
        let doc = Node::mapping([
            ("a", Node::alias(outer.clone().into_ref())),
            ("b", Node::alias(inner.into_ref())),
            ("c", outer),
        ]);
        assert_eq!(serialize(&doc).unwrap(), "a: &o\n  k: &i 7\nb: *i\nc: *o");
    }

    #[test]
    fn test_changed_referent_is_written_again() {
        let target = Node::from(vec![1i64]).with_anchor("x");
        let shared = target.clone().into_ref();
        shared.write().value = Value::Sequence(vec![Node::int(2)]);
        let doc = Node::mapping([("a", target), ("b", Node::alias(shared))]);
        assert_eq!(serialize(&doc).unwrap(), "a: &x\n  - 1\nb: &x\n  - 2");
    }

    #[test]
    fn test_repeated_anchor_name() {
        let first = Node::int(1).with_anchor("v");
        let second = Node::int(2).with_anchor("v");
        let doc = Node::sequence([
            first.clone(),
            Node::alias(first.into_ref()),
            second.clone(),
            Node::alias(second.into_ref()),
        ]);
        assert_eq!(serialize(&doc).unwrap(), "- &v 1\n- *v\n- &v 2\n- *v");
    }

    #[test]
    fn test_root_anchor() {
        let doc = Node::mapping([("k", Node::int(1))]).with_anchor("r");
        assert_eq!(serialize(&doc).unwrap(), "&r\nk: 1");
        assert_eq!(serialize(&Node::int(1).with_anchor("r")).unwrap(), "&r 1");
    }

    #[test]
    fn test_unanchored_alias_fails() {
        let doc = Node::sequence([Node::alias(Node::int(1).into_ref())]);
        assert_eq!(serialize(&doc), Err(SerializeError::UnanchoredAlias));
    }

    #[test]
    fn test_invalid_anchor_name_fails() {
        let doc = Node::int(1).with_anchor("a b");
        assert_eq!(
            serialize(&doc),
            Err(SerializeError::InvalidAnchorName("a b".into()))
        );
        let doc = Node::sequence([Node::int(1).with_anchor("")]);
        assert!(matches!(
            serialize(&doc),
            Err(SerializeError::InvalidAnchorName(_))
        ));
    }

    #[test]
    fn test_nested_layout() {
        let doc = Node::sequence([
            Node::mapping([("x", Node::int(1)), ("y", Node::from(vec!["a"]))]),
            Node::from(vec![true]),
        ]);
        assert_eq!(
            serialize(&doc).unwrap(),
            "-\n  x: 1\n  y:\n    - \"a\"\n-\n  - true"
        );
    }
}
