use std::iter::FusedIterator;

use itertools::Itertools;

use super::*;

pub trait Connectivity: AdjacencyList + Traversal + Sized {
    /// Returns an iterator over the connected components of the graph, each a list of nodes
    fn connected_components(&self) -> ConnectedComponents<'_, Self> {
        ConnectedComponents::new(self)
    }

    /// Collects the connected components while polling `cancel` once per visited node
    fn connected_components_with(&self, cancel: &CancelToken) -> Result<Vec<Vec<Node>>, Cancelled> {
        let mut ticker = cancel.ticker();
        let mut components = Vec::new();
        let mut bfs = BFS::idle(self);
        while bfs.try_restart_at_unvisited() {
            let mut component = Vec::new();
            for u in bfs.by_ref() {
                ticker.tick()?;
                component.push(u);
            }
            components.push(component);
        }
        Ok(components)
    }

    /// Returns *true* if the graph has at most one connected component
    fn is_connected(&self) -> bool {
        self.connected_components().nth(1).is_none()
    }
}

impl<G> Connectivity for G where G: AdjacencyList + Sized {}

pub struct ConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    bfs: BFS<'a, G>,
}

impl<'a, G> ConnectedComponents<'a, G>
where
    G: AdjacencyList,
{
    pub fn new(graph: &'a G) -> Self {
        Self {
            bfs: BFS::idle(graph),
        }
    }
}

impl<G> Iterator for ConnectedComponents<'_, G>
where
    G: AdjacencyList,
{
    type Item = Vec<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cc = self.bfs.by_ref().collect_vec();
            if !cc.is_empty() {
                return Some(cc);
            }

            if !self.bfs.try_restart_at_unvisited() {
                return None;
            }
        }
    }
}

impl<G> FusedIterator for ConnectedComponents<'_, G> where G: AdjacencyList {}

impl LabelledGraph {
    /// Splits the graph into one densely numbered induced subgraph per connected component.
    /// Components appear in the order of their smallest node; within a component nodes keep
    /// their BFS order.
    pub fn split_into_components(&self, cancel: &CancelToken) -> Result<Vec<Self>, Cancelled> {
        let components = self.connected_components_with(cancel)?;
        let mut ticker = cancel.ticker();
        let mut graphs = Vec::with_capacity(components.len());
        for nodes in &components {
            ticker.tick()?;
            graphs.push(self.vertex_induced(nodes, cancel)?);
        }
        Ok(graphs)
    }
}
