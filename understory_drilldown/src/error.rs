// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout failures.

use alloc::string::String;
use core::fmt;

use crate::types::NodeId;

/// Error returned by a layout pass.
///
/// Both variants mean the produced geometry would be meaningless, so the pass
/// is abandoned rather than emitting circles with a zero or NaN radius.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A node's level has no entry in the configured
    /// [`LevelFactors`](crate::LevelFactors).
    UnmappedLevel {
        /// Offending node.
        id: NodeId,
        /// Level with no radius factor.
        level: u32,
    },
    /// A node reached layout without an id.
    ///
    /// Nodes owned by a [`Tree`](crate::Tree) always have one; this only
    /// happens when [`layout`](crate::layout) is called on hand-built nodes.
    UnassignedId {
        /// Name of the node, for diagnostics.
        name: String,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedLevel { id, level } => write!(
                f,
                "node {} is at level {level}, which has no radius factor",
                id.get()
            ),
            Self::UnassignedId { name } => {
                write!(f, "node {name:?} has no id; insert it through a Tree")
            }
        }
    }
}

impl core::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::LayoutError;
    use crate::types::NodeId;

    #[test]
    fn display_names_the_level() {
        let err = LayoutError::UnmappedLevel {
            id: NodeId::new(7),
            level: 4,
        };
        assert_eq!(
            err.to_string(),
            "node 7 is at level 4, which has no radius factor",
            "message carries id and level"
        );
    }
}
