use fxhash::FxHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::*;

/// An undirected, simple graph whose nodes carry a [`NodeLabel`].
///
/// Nodes live in an arena and are addressed by their index. Deleting a node
/// tombstones its slot and filters it out of every neighbor's adjacency, so indices
/// of the remaining nodes stay valid. Use [`LabelledGraph::compacted`] to obtain a
/// densely numbered copy.
///
/// Invariants:
/// - `v` is a neighbor of `u` iff `u` is a neighbor of `v`
/// - no self-loops, no parallel edges
/// - node names are unique among live nodes
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelledGraph {
    labels: Vec<NodeLabel>,
    nbs: Vec<HashNeighborhood>,
    removed: Vec<bool>,
    index: FxHashMap<String, Node>,
    num_nodes: NumNodes,
    num_edges: NumEdges,
}

impl LabelledGraph {
    /// Creates a graph without nodes
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph without nodes reserving space for `n` nodes
    pub fn with_capacity(n: usize) -> Self {
        Self {
            labels: Vec::with_capacity(n),
            nbs: Vec::with_capacity(n),
            removed: Vec::with_capacity(n),
            index: FxHashMap::with_capacity_and_hasher(n, Default::default()),
            num_nodes: 0,
            num_edges: 0,
        }
    }

    /// Adds a singleton node and returns its index.
    /// ** Panics if a live node with the same name exists **
    pub fn add_node<S: Into<String>>(&mut self, name: S, is_integer: bool) -> Node {
        let label = NodeLabel::new(name, is_integer);
        match self.try_add_node(label) {
            Ok(u) => u,
            Err(u) => panic!("Duplicate node name {:?}", self.name_of(u)),
        }
    }

    /// Adds a singleton node carrying `label`.
    /// Returns `Err(existing)` if a live node with the same name is present.
    pub fn try_add_node(&mut self, label: NodeLabel) -> Result<Node, Node> {
        if let Some(&existing) = self.index.get(&label.name) {
            return Err(existing);
        }

        let u = self.labels.len() as Node;
        assert_ne!(u, INVALID_NODE, "Node arena is exhausted");
        self.index.insert(label.name.clone(), u);
        self.labels.push(label);
        self.nbs.push(HashNeighborhood::new());
        self.removed.push(false);
        self.num_nodes += 1;
        Ok(u)
    }

    /// Returns the name of node `u`
    pub fn name_of(&self, u: Node) -> &str {
        &self.labels[u as usize].name
    }

    /// Returns the integrality flag of node `u`
    pub fn is_integer(&self, u: Node) -> bool {
        self.labels[u as usize].is_integer
    }

    /// Looks up a live node by name
    pub fn node_by_name(&self, name: &str) -> Option<Node> {
        self.index.get(name).copied()
    }

    /// Returns the number of live nodes flagged as integer
    pub fn number_of_integer_nodes(&self) -> NumNodes {
        self.vertices().filter(|&u| self.is_integer(u)).count() as NumNodes
    }

    /// Returns every edge as a pair of node names, each pair ordered and the list sorted.
    /// Two graphs with equal name-edge lists are equal up to node numbering.
    pub fn named_edges(&self) -> Vec<(String, String)> {
        let mut edges = self
            .edges(true)
            .map(|Edge(u, v)| {
                let (a, b) = (self.name_of(u), self.name_of(v));
                if a <= b {
                    (a.to_string(), b.to_string())
                } else {
                    (b.to_string(), a.to_string())
                }
            })
            .collect_vec();
        edges.sort_unstable();
        edges
    }

    /// Creates the subgraph induced by `vertices`. Nodes are renumbered
    /// `0..vertices.len()` in the given order; labels are copied.
    /// ** Panics if `vertices` contains a deleted node or duplicates **
    pub fn vertex_induced(
        &self,
        vertices: &[Node],
        cancel: &CancelToken,
    ) -> Result<Self, Cancelled> {
        let mut ticker = cancel.ticker();
        let mut mapping = vec![INVALID_NODE; self.capacity()];
        let mut graph = Self::with_capacity(vertices.len());

        for &old in vertices {
            ticker.tick()?;
            assert!(!self.is_removed(old), "Cannot induce on deleted node {old}");
            assert_eq!(mapping[old as usize], INVALID_NODE, "Duplicate node {old}");
            mapping[old as usize] = graph.add_node(self.name_of(old), self.is_integer(old));
        }

        for &old_u in vertices {
            let new_u = mapping[old_u as usize];
            for old_v in self.neighbors_of(old_u) {
                ticker.tick()?;
                let new_v = mapping[old_v as usize];
                if new_v != INVALID_NODE && new_u < new_v {
                    graph.add_edge(new_u, new_v);
                }
            }
        }

        Ok(graph)
    }

    /// Returns a copy without tombstones; live nodes keep their relative order.
    pub fn compacted(&self, cancel: &CancelToken) -> Result<Self, Cancelled> {
        self.vertex_induced(&self.vertices().collect_vec(), cancel)
    }
}

impl GraphNodeOrder for LabelledGraph {
    fn number_of_nodes(&self) -> NumNodes {
        self.num_nodes
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.removed
            .iter()
            .enumerate()
            .filter_map(|(u, &removed)| (!removed).then_some(u as Node))
    }

    fn capacity(&self) -> usize {
        self.labels.len()
    }
}

impl GraphEdgeOrder for LabelledGraph {
    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }
}

impl AdjacencyList for LabelledGraph {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.nbs[u as usize].neighbors()
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.nbs[u as usize].num_of_neighbors()
    }
}

impl AdjacencyTest for LabelledGraph {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.nbs[u as usize].has_neighbor(v)
    }
}

impl GraphEdgeEditing for LabelledGraph {
    fn try_add_edge(&mut self, u: Node, v: Node) -> bool {
        assert_ne!(u, v, "Self-loops are not supported");
        debug_assert!(!self.removed[u as usize] && !self.removed[v as usize]);

        if self.nbs[u as usize].try_add_neighbor(v) {
            true
        } else {
            assert!(!self.nbs[v as usize].try_add_neighbor(u));
            self.num_edges += 1;
            false
        }
    }

    fn try_remove_edge(&mut self, u: Node, v: Node) -> bool {
        if self.nbs[u as usize].try_remove_neighbor(v) {
            assert!(self.nbs[v as usize].try_remove_neighbor(u));
            self.num_edges -= 1;
            true
        } else {
            false
        }
    }
}

impl GraphNodeEditing for LabelledGraph {
    fn remove_node(&mut self, u: Node) -> bool {
        if self.removed[u as usize] {
            return false;
        }

        let nbs = self.nbs[u as usize].take();
        for &v in &nbs {
            self.nbs[v as usize].try_remove_neighbor(u);
        }
        self.num_edges -= nbs.len() as NumEdges;

        self.removed[u as usize] = true;
        self.index.remove(&self.labels[u as usize].name);
        self.num_nodes -= 1;
        true
    }

    fn is_removed(&self, u: Node) -> bool {
        self.removed[u as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: Node) -> LabelledGraph {
        let mut graph = LabelledGraph::new();
        for u in 0..n {
            graph.add_node(format!("x{u}"), u % 2 == 0);
        }
        graph.add_edges((1..n).map(|u| (u - 1, u)));
        graph
    }

    #[test]
    fn adjacency_stays_symmetric() {
        let mut graph = path_graph(5);
        assert_eq!(graph.number_of_nodes(), 5);
        assert_eq!(graph.number_of_edges(), 4);

        assert!(graph.try_add_edge(1, 0));
        assert!(!graph.try_add_edge(4, 0));
        assert_eq!(graph.number_of_edges(), 5);

        for Edge(u, v) in graph.edges(false) {
            assert!(graph.has_edge(v, u));
        }
        assert_eq!(graph.edges(true).count() as NumEdges, graph.number_of_edges());

        assert!(graph.try_remove_edge(0, 4));
        assert!(!graph.try_remove_edge(4, 0));
        assert_eq!(graph.number_of_edges(), 4);
    }

    #[test]
    #[should_panic]
    fn rejects_self_loops() {
        let mut graph = path_graph(2);
        graph.try_add_edge(1, 1);
    }

    #[test]
    fn remove_node_tombstones() {
        let mut graph = path_graph(5);
        assert!(graph.remove_node(2));
        assert!(!graph.remove_node(2));

        assert_eq!(graph.number_of_nodes(), 4);
        assert_eq!(graph.number_of_edges(), 2);
        assert_eq!(graph.capacity(), 5);
        assert_eq!(graph.vertices().collect_vec(), vec![0, 1, 3, 4]);
        assert_eq!(graph.degree_of(1), 1);
        assert_eq!(graph.degree_of(3), 1);
        assert!(graph.node_by_name("x2").is_none());

        let compact = graph.compacted(&CancelToken::new()).unwrap();
        assert_eq!(compact.capacity(), 4);
        assert_eq!(compact.number_of_edges(), 2);
        assert_eq!(compact.named_edges(), graph.named_edges());
        assert_eq!(compact.node_by_name("x3"), Some(2));
    }

    #[test]
    fn vertex_induced_keeps_labels() {
        let graph = path_graph(6);
        let sub = graph.vertex_induced(&[4, 3, 2], &CancelToken::new()).unwrap();

        assert_eq!(sub.number_of_nodes(), 3);
        assert_eq!(sub.name_of(0), "x4");
        assert!(sub.is_integer(0));
        assert!(!sub.is_integer(1));
        assert_eq!(
            sub.named_edges(),
            vec![
                ("x2".to_string(), "x3".to_string()),
                ("x3".to_string(), "x4".to_string())
            ]
        );
    }

    #[test]
    fn clique_insertion_is_idempotent() {
        let token = CancelToken::new();
        let mut graph = path_graph(4);
        assert_eq!(graph.connect_clique(&[0, 1, 2, 3], &mut token.ticker()), Ok(3));
        assert_eq!(graph.connect_clique(&[0, 1, 2, 3], &mut token.ticker()), Ok(0));
        assert!(graph.is_clique(&[0, 1, 2, 3]));
        assert_eq!(graph.number_of_edges(), 6);
    }

    #[test]
    fn clique_insertion_stops_once_cancelled() {
        let mut graph = path_graph(40);
        let nodes = (0..40).collect_vec();
        let token = CancelToken::new();
        token.cancel();

        assert_eq!(graph.connect_clique(&nodes, &mut token.ticker()), Err(Cancelled));
        // at most one stride of pairs is inserted before the token is polled
        assert!(graph.number_of_edges() < 39 + CHECK_STRIDE as NumEdges);
        assert!(!graph.is_clique(&nodes));

        assert_eq!(graph.remove_nodes(nodes.clone(), &mut token.ticker()), Err(Cancelled));
        assert!(graph.number_of_nodes() > 30);
        assert_eq!(graph.compacted(&token), Err(Cancelled));
        assert_eq!(graph.vertex_induced(&nodes[20..], &token), Err(Cancelled));
    }

    #[test]
    fn serde_roundtrip_is_indistinguishable() {
        let mut graph = path_graph(5);
        graph.remove_node(0);
        let json = serde_json::to_string(&graph).unwrap();
        let back: LabelledGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.node_by_name("x3"), Some(3));
    }
}
