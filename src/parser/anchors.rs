//! Per-document anchor table.

use std::collections::HashMap;

use crate::node::{Node, NodeRef};

/// Maps anchor names to the shared node they were bound to. Created fresh
/// for every parse and dropped when the parse returns.
#[derive(Debug, Default)]
pub(crate) struct AnchorTable {
    anchors: HashMap<String, NodeRef>,
}

impl AnchorTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a shared copy of `node`, which already carries the
    /// anchor name. A later definition of the
    /// same name replaces the earlier one for subsequent aliases.
    pub(crate) fn define(&mut self, name: &str, node: &Node) {
        let previous = self.anchors.insert(name.to_string(), node.clone().into_ref());
        if previous.is_some() {
            log::debug!("anchor &{} redefined", name);
        } else {
            log::trace!("anchor &{} defined ({})", name, node.type_name());
        }
    }

    /// Shared handle for `name`, if it has been defined.
    pub(crate) fn resolve(&self, name: &str) -> Option<NodeRef> {
        self.anchors.get(name).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.anchors.len()
    }
}
