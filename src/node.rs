//! The tree value produced by parsing and consumed by serialization.
//!
//! A [`Node`] pairs a [`Value`] with an optional anchor name. Aliases hold a
//! [`NodeRef`], a shared handle to the anchored node they refer to, so every
//! alias of the same anchor sees the same data.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// Shared handle to an anchored node, held by the anchor table during
/// parsing and by every alias that refers to it.
pub type NodeRef = Arc<RwLock<Node>>;

/// Mapping entries, iterated in ascending key order.
pub type Mapping = BTreeMap<String, Node>;

/// Sequence items.
pub type Sequence = Vec<Node>;

/// Content of a node.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// `null`, `~` or empty
    #[default]
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer that fits in 64 bits
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// Text
    String(String),
    /// Ordered list of nodes
    Sequence(Sequence),
    /// Unique string keys to nodes (ascending key order, not source order)
    Mapping(Mapping),
    /// Reference to an anchored node (`*name`)
    Alias(NodeRef),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            // Shared referents compare equal without taking the lock twice.
            (Value::Alias(a), Value::Alias(b)) => Arc::ptr_eq(a, b) || *a.read() == *b.read(),
            _ => false,
        }
    }
}

/// A YAML node: a value plus the anchor name it was declared with, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// The node's content
    pub value: Value,
    /// Anchor name (`&name`) bound to this node
    pub anchor: Option<String>,
}

impl Node {
    /// Create an unanchored node.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            anchor: None,
        }
    }

    /// Create a null node.
    pub fn null() -> Self {
        Self::new(Value::Null)
    }

    /// Create a boolean node.
    pub fn bool(b: bool) -> Self {
        Self::new(Value::Bool(b))
    }

    /// Create an integer node.
    pub fn int(n: i64) -> Self {
        Self::new(Value::Int(n))
    }

    /// Create a float node.
    pub fn float(f: f64) -> Self {
        Self::new(Value::Float(f))
    }

    /// Create a string node.
    pub fn string(s: impl Into<String>) -> Self {
        Self::new(Value::String(s.into()))
    }

    /// Create a sequence node from its items.
    pub fn sequence(items: impl IntoIterator<Item = Node>) -> Self {
        Self::new(Value::Sequence(items.into_iter().collect()))
    }

    /// Create a mapping node from key-value pairs. Later duplicates win.
    pub fn mapping<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Node)>) -> Self {
        Self::new(Value::Mapping(
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Create an alias node referring to `target`.
    pub fn alias(target: NodeRef) -> Self {
        Self::new(Value::Alias(target))
    }

    /// Attach an anchor name.
    pub fn with_anchor(mut self, name: impl Into<String>) -> Self {
        self.anchor = Some(name.into());
        self
    }

    /// Wrap this node in a shared handle, suitable as an alias target.
    pub fn into_ref(self) -> NodeRef {
        Arc::new(RwLock::new(self))
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self.value, Value::Bool(_))
    }

    /// True for both integer and float nodes.
    pub fn is_number(&self) -> bool {
        matches!(self.value, Value::Int(_) | Value::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.value, Value::String(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.value, Value::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.value, Value::Mapping(_))
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.value, Value::Alias(_))
    }

    /// Scalars and aliases; everything that is not a sequence or mapping.
    pub fn is_scalar(&self) -> bool {
        !self.is_sequence() && !self.is_mapping()
    }

    /// Get the type name of this node.
    pub fn type_name(&self) -> &'static str {
        match self.value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Alias(_) => "alias",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Numeric value of an integer or float node.
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            Value::Int(n) => Some(n as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match &self.value {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match &mut self.value {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match &self.value {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match &mut self.value {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// The shared node an alias refers to.
    pub fn referent(&self) -> Option<&NodeRef> {
        match &self.value {
            Value::Alias(target) => Some(target),
            _ => None,
        }
    }

    /// Look up a mapping entry by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Look up a sequence item by index.
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        self.as_sequence().and_then(|items| items.get(index))
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::new(value)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::bool(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::int(n)
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::float(f)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::string(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::string(s)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(items: Vec<T>) -> Self {
        Node::sequence(items.into_iter().map(Into::into))
    }
}

// Anchors have no JSON counterpart; aliases are written out as the content
// they refer to.
#[cfg(feature = "serde")]
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => serializer.collect_seq(items),
            Value::Mapping(map) => serializer.collect_map(map),
            Value::Alias(target) => target.read().serialize(serializer),
        }
    }
}
