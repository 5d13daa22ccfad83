/*!
# Node Representation

Nodes are `u32` indices into the arena of a [`LabelledGraph`](crate::repr::LabelledGraph).
The human-readable identity of a node (variable or row name) lives in its [`NodeLabel`];
indices are only stable within a single graph instance.
*/

use serde::{Deserialize, Serialize};

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// Label attached to every node of a [`LabelledGraph`](crate::repr::LabelledGraph).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeLabel {
    /// Name of the originating variable or row; unique within a graph
    pub name: String,
    /// Integrality of the originating variable. Row nodes always carry `true`,
    /// which makes them non-contractible for the torso computation.
    pub is_integer: bool,
}

impl NodeLabel {
    pub fn new<S: Into<String>>(name: S, is_integer: bool) -> Self {
        Self {
            name: name.into(),
            is_integer,
        }
    }
}
