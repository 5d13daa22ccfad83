use itertools::Itertools;

use crate::{cancel::*, *};

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of (live) nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns an iterator over the live vertices.
    fn vertices(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns the size of the node arena, i.e. one more than the largest
    /// node index ever handed out (including deleted nodes).
    fn capacity(&self) -> usize;

    /// Returns a range of vertices possibly including deleted vertices.
    /// In contrast to self.vertices(), the range returned by self.vertices_range() does
    /// not borrow self and hence may be used where additional mutable references of self are needed
    ///
    /// # Warning
    /// This method iterates over deleted vertices. It is the
    /// responsibility of the caller to identify and treat them accordingly.
    fn vertices_range(&self) -> std::ops::Range<Node> {
        0..self.capacity() as Node
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.number_of_nodes() == 0
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

/// Traits pertaining getters for neighborhoods & edges
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns an iterator over the (open) neighborhood of a given vertex.
    /// ** Panics if `u` is not in the arena **
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns the number of neighbors of `u`
    /// ** Panics if `u` is not in the arena **
    fn degree_of(&self, u: Node) -> NumNodes;

    /// Returns an iterator over edges incident to `u`.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    fn edges_of(&self, u: Node, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.neighbors_of(u)
            .map(move |v| Edge(u, v))
            .filter(move |e| !only_normalized || e.is_normalized())
    }

    /// Returns an iterator over all edges in the graph.
    /// If `only_normalized`, every undirected edge is reported exactly once.
    fn edges(&self, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.vertices()
            .flat_map(move |u| self.edges_of(u, only_normalized))
    }
}

/// Trait to test existence of certain structures in a graph.
pub trait AdjacencyTest: GraphNodeOrder {
    /// Returns *true* if the edge {u,v} exists in the graph.
    fn has_edge(&self, u: Node, v: Node) -> bool;

    /// Returns *true* if every pair of distinct nodes in `nodes` is connected.
    fn is_clique(&self, nodes: &[Node]) -> bool {
        nodes
            .iter()
            .tuple_combinations()
            .all(|(&u, &v)| self.has_edge(u, v))
    }
}

/// Provides functions to insert/delete edges
pub trait GraphEdgeEditing {
    /// Adds the edge `{u, v}` to the graph.
    /// Returns *true* exactly if the edge was present previously.
    /// ** Panics if `u == v` or either endpoint is not a live node **
    fn try_add_edge(&mut self, u: Node, v: Node) -> bool;

    /// Adds the edge *{u,v}* to the graph.
    /// ** Panics if the edge was already present **
    fn add_edge(&mut self, u: Node, v: Node) {
        assert!(!self.try_add_edge(u, v));
    }

    /// Adds all edges in the collection, ignoring those already present
    fn add_edges(&mut self, edges: impl IntoIterator<Item = impl Into<Edge>>) {
        for Edge(u, v) in edges.into_iter().map(|d| d.into()) {
            self.try_add_edge(u, v);
        }
    }

    /// Removes the edge `{u, v}` from the graph.
    /// If the edge was removed, returns *true* and *false* otherwise.
    fn try_remove_edge(&mut self, u: Node, v: Node) -> bool;

    /// Connects all given nodes into a clique. Already existing edges are kept,
    /// so the operation is idempotent. Returns the number of inserted edges.
    ///
    /// Ticks once per node pair; the clique may be partially inserted on `Err(Cancelled)`.
    fn connect_clique(
        &mut self,
        nodes: &[Node],
        ticker: &mut Ticker,
    ) -> Result<NumEdges, Cancelled> {
        let mut inserted = 0;
        for (i, &u) in nodes.iter().enumerate() {
            for &v in &nodes[i + 1..] {
                ticker.tick()?;
                if u != v && !self.try_add_edge(u, v) {
                    inserted += 1;
                }
            }
        }
        Ok(inserted)
    }
}

/// Provides functions to delete nodes
pub trait GraphNodeEditing {
    /// Deletes node `u` together with all incident edges.
    /// Returns *false* if the node was already deleted.
    fn remove_node(&mut self, u: Node) -> bool;

    /// Deletes all given nodes. Returns the number of nodes actually deleted.
    fn remove_nodes<I: IntoIterator<Item = Node>>(
        &mut self,
        nodes: I,
        ticker: &mut Ticker,
    ) -> Result<NumNodes, Cancelled> {
        let mut removed = 0;
        for u in nodes {
            ticker.tick()?;
            removed += self.remove_node(u) as NumNodes;
        }
        Ok(removed)
    }

    /// Returns *true* if node `u` was deleted
    fn is_removed(&self, u: Node) -> bool;
}
