//! Graph builders shared by the unit tests

use rand::Rng;

use crate::prelude::*;

/// Creates a graph on nodes `v0..v{n-1}`, where node `u` is integer iff `is_integer(u)`
pub(crate) fn graph_from_edges<F, I, E>(n: NumNodes, is_integer: F, edges: I) -> LabelledGraph
where
    F: Fn(Node) -> bool,
    I: IntoIterator<Item = E>,
    E: Into<Edge>,
{
    let mut graph = LabelledGraph::with_capacity(n as usize);
    for u in 0..n {
        graph.add_node(format!("v{u}"), is_integer(u));
    }
    graph.add_edges(edges);
    graph
}

/// Creates a `G(n,p)` graph without self-loops whose nodes are integer with probability `int_prob`
pub(crate) fn random_graph<R: Rng>(
    rng: &mut R,
    n: NumNodes,
    p: f64,
    int_prob: f64,
) -> LabelledGraph {
    let flags: Vec<bool> = (0..n).map(|_| rng.random_bool(int_prob)).collect();
    let mut edges = Vec::new();
    for u in 0..n {
        for v in u + 1..n {
            if rng.random_bool(p) {
                edges.push(Edge(u, v));
            }
        }
    }
    graph_from_edges(n, |u| flags[u as usize], edges)
}
