use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::*;

/// Neighborhood of a single node backed by an `FxHashSet<Node>`.
///
/// Rows of a constraint matrix can be arbitrarily dense, so the generators insert
/// the same pair many times; hashing keeps duplicate detection constant time.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashNeighborhood(FxHashSet<Node>);

impl HashNeighborhood {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of neighbors in the Neighborhood
    pub fn num_of_neighbors(&self) -> NumNodes {
        self.0.len() as NumNodes
    }

    /// Returns an iterator over all neighbors in the Neighborhood
    pub fn neighbors(&self) -> impl Iterator<Item = Node> + '_ {
        self.0.iter().copied()
    }

    /// Returns *true* if `v` is in the Neighborhood
    pub fn has_neighbor(&self, v: Node) -> bool {
        self.0.contains(&v)
    }

    /// Tries to add a neighbor to the Neighborhood.
    /// Returns *true* if the node was in the Neighborhood before.
    pub fn try_add_neighbor(&mut self, u: Node) -> bool {
        !self.0.insert(u)
    }

    /// Tries to remove a neighbor from the Neighborhood.
    /// Returns *true* if the node was in the Neighborhood before.
    pub fn try_remove_neighbor(&mut self, u: Node) -> bool {
        self.0.remove(&u)
    }

    /// Removes all neighbors in the Neighborhood and returns them
    pub fn take(&mut self) -> FxHashSet<Node> {
        std::mem::take(&mut self.0)
    }
}
