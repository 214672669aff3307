//! # yamln
//!
//! A small YAML reader and canonical writer.
//!
//! This crate parses a practical subset of YAML 1.2 into a typed [`Node`]
//! tree and writes trees back out in one deterministic, block-style form.
//!
//! ## Module Organization
//!
//! - [`node`] - Typed document tree with anchors and shared alias targets
//! - [`parser`] - Indentation-sensitive parser (block + flow, scalars, anchors)
//! - [`serializer`] - Canonical emitter
//! - [`config`] - Parser limits
//! - [`error`] - Parse and serialize errors
//!
//! ## Quick Start
//!
//! ```
//! use yamln::{parse, serialize, Node};
//!
//! let doc = parse("b: [1, 2.5, x]\na: &anchor {k: ~}\nc: *anchor").unwrap();
//! assert_eq!(doc.get("b").and_then(|b| b.get_index(1)), Some(&Node::float(2.5)));
//!
//! // Keys are written in sorted order, strings always quoted.
//! let text = serialize(&doc).unwrap();
//! assert_eq!(text, "a: &anchor\n  k: null\nb:\n  - 1\n  - 2.5\n  - \"x\"\nc: *anchor");
//!
//! // Canonical output parses back to an equal tree.
//! assert_eq!(parse(&text).unwrap(), doc);
//! ```
//!
//! ## Features
//!
//! - `serde` - `Serialize` for [`Node`] and `Serialize`/`Deserialize` for
//!   [`ParseConfig`]
//! - `cli` - The `yamln` command-line tool

// =============================================================================
// Modules
// =============================================================================

/// Parser configuration.
pub mod config;

/// Error types.
pub mod error;

/// Document tree.
pub mod node;

/// YAML parser.
pub mod parser;

/// Canonical YAML emitter.
pub mod serializer;

// =============================================================================
// Public re-exports
// =============================================================================

pub use config::{ParseConfig, DEFAULT_MAX_DEPTH};
pub use error::{ParseError, ParseErrorKind, SerializeError};
pub use node::{Mapping, Node, NodeRef, Sequence, Value};
pub use parser::{coerce_scalar, parse, parse_with_config};
pub use serializer::serialize;
