//! Configuration for YAML parsing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default limit on nested nodes.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration for YAML parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseConfig {
    /// Deepest node level accepted before parsing fails (default: 128). The
    /// root node is at level 1 and the entries of a block or flow collection
    /// are one level below it, so `[[1]]` needs a depth of 3.
    pub max_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
