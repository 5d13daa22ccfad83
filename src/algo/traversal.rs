/*!
Graph traversal algorithms.

This module provides:
- A lazy breadth-first search iterator ([`BFS`]) that can be restarted at unvisited nodes.
- The height of a depth-first spanning tree, which bounds the tree-depth of a connected graph.
- A high-level `Traversal` trait that exposes both directly as methods on graph data structures.
*/

use std::collections::VecDeque;

use super::*;

/// A BFS traversal iterator over the graph, visiting nodes in
/// breadth-first order from a given starting node.
///
/// The visited-state spans the whole node arena, so deleted nodes are never reached as long
/// as no live node lists them as neighbor.
pub struct BFS<'a, G>
where
    G: AdjacencyList,
{
    graph: &'a G,
    visited: Vec<bool>,
    queue: VecDeque<Node>,
}

impl<'a, G> BFS<'a, G>
where
    G: AdjacencyList,
{
    /// Creates a new traversal iterator starting from `start`.
    pub fn new(graph: &'a G, start: Node) -> Self {
        let mut visited = vec![false; graph.capacity()];
        visited[start as usize] = true;
        Self {
            graph,
            visited,
            queue: VecDeque::from(vec![start]),
        }
    }

    /// Creates an iterator that has not been started yet; use
    /// [`BFS::try_restart_at_unvisited`] to start it.
    pub fn idle(graph: &'a G) -> Self {
        Self {
            graph,
            visited: vec![false; graph.capacity()],
            queue: VecDeque::new(),
        }
    }

    /// Tries to restart the search at an yet unvisited node and returns
    /// true iff successful. Requires that search came to a hold earlier,
    /// i.e. self.next() returned None
    pub fn try_restart_at_unvisited(&mut self) -> bool {
        assert!(self.queue.is_empty());
        match self.graph.vertices().find(|&u| !self.visited[u as usize]) {
            None => false,
            Some(x) => {
                self.visited[x as usize] = true;
                self.queue.push_back(x);
                true
            }
        }
    }
}

impl<G> Iterator for BFS<'_, G>
where
    G: AdjacencyList,
{
    type Item = Node;

    fn next(&mut self) -> Option<Self::Item> {
        let u = self.queue.pop_front()?;
        for v in self.graph.neighbors_of(u) {
            if !self.visited[v as usize] {
                self.visited[v as usize] = true;
                self.queue.push_back(v);
            }
        }
        Some(u)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.graph.len()))
    }
}

/// Provides convenient traversal methods
pub trait Traversal: AdjacencyList + Sized {
    /// Returns an iterator that traverses nodes reachable from `start`
    /// in **breadth-first search (BFS) order**.
    ///
    /// # Examples
    /// ```
    /// use mipgraphs::{prelude::*, algo::*};
    ///
    /// let mut g = LabelledGraph::new();
    /// let (a, b) = (g.add_node("a", true), g.add_node("b", false));
    /// g.add_edge(a, b);
    ///
    /// let order: Vec<_> = g.bfs(a).collect();
    /// assert_eq!(order, vec![a, b]);
    /// ```
    fn bfs(&self, start: Node) -> BFS<'_, Self> {
        BFS::new(self, start)
    }

    /// Computes the height of a depth-first spanning tree rooted at `root`, where `root` has
    /// depth 1. Every edge of an undirected graph connects an ancestor to a descendant in such a
    /// tree, so its height bounds the tree-depth from above.
    ///
    /// Returns `None` if the search does not reach every live node.
    ///
    /// # Examples
    /// ```
    /// use mipgraphs::{prelude::*, algo::*};
    ///
    /// let mut g = LabelledGraph::new();
    /// for name in ["a", "b", "c"] {
    ///     g.add_node(name, true);
    /// }
    /// g.add_edges([(0, 1), (1, 2)]);
    ///
    /// let token = CancelToken::new();
    /// assert_eq!(g.dfs_tree_height(1, &token), Ok(Some(2)));
    /// assert_eq!(g.dfs_tree_height(0, &token), Ok(Some(3)));
    /// ```
    fn dfs_tree_height(
        &self,
        root: Node,
        cancel: &CancelToken,
    ) -> Result<Option<NumNodes>, Cancelled> {
        let mut ticker = cancel.ticker();
        let mut visited = vec![false; self.capacity()];
        visited[root as usize] = true;
        let mut num_visited: NumNodes = 1;
        let mut height: NumNodes = 1;

        let mut stack = vec![(1 as NumNodes, self.neighbors_of(root))];
        while let Some((depth, nbs)) = stack.last_mut() {
            ticker.tick()?;
            let depth = *depth;
            match nbs.find(|&v| !visited[v as usize]) {
                Some(v) => {
                    visited[v as usize] = true;
                    num_visited += 1;
                    height = height.max(depth + 1);
                    stack.push((depth + 1, self.neighbors_of(v)));
                }
                None => {
                    stack.pop();
                }
            }
        }

        Ok((num_visited == self.number_of_nodes()).then_some(height))
    }
}

impl<G> Traversal for G where G: AdjacencyList + Sized {}
