/*!
# Graph Statistics

Read-only snapshot of a generated graph. Degrees are taken from the adjacency of the
[`LabelledGraph`] rather than from an edge list, so the snapshot stays correct for graphs that
algorithms edited in place. Width parameters start out empty and are filled in once as each
algorithm completes.
*/

use serde::{Deserialize, Serialize};

use crate::{algo::*, gens::*, prelude::*};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub representation: GraphRepresentation,
    pub num_nodes: NumNodes,
    pub num_int_nodes: NumNodes,
    pub prop_int_nodes: f64,
    pub num_edges: NumEdges,
    pub density: f64,
    pub min_degree: NumNodes,
    pub max_degree: NumNodes,
    pub avg_degree: f64,
    pub num_components: usize,

    pub treewidth_lb: Option<usize>,
    pub treewidth_ub: Option<usize>,
    pub torso_width_lb: Option<usize>,
    pub torso_width_ub: Option<usize>,
    pub tree_depth_lb: Option<usize>,
    pub tree_depth_ub: Option<usize>,
}

impl GraphStatistics {
    /// Computes the structural statistics of `graph`; all width parameters are unset.
    pub fn compute(
        graph: &LabelledGraph,
        representation: GraphRepresentation,
        density: DensityKind,
        cancel: &CancelToken,
    ) -> Result<Self, Cancelled> {
        let mut ticker = cancel.ticker();
        let num_nodes = graph.number_of_nodes();
        let num_edges = graph.number_of_edges();

        let mut num_int_nodes = 0;
        let mut degree_sum: u64 = 0;
        let mut min_degree = NumNodes::MAX;
        let mut max_degree = 0;
        for u in graph.vertices() {
            ticker.tick()?;
            let degree = graph.degree_of(u);
            degree_sum += degree as u64;
            min_degree = min_degree.min(degree);
            max_degree = max_degree.max(degree);
            num_int_nodes += graph.is_integer(u) as NumNodes;
        }

        let num_components = graph.connected_components_with(cancel)?.len();

        Ok(Self {
            representation,
            num_nodes,
            num_int_nodes,
            prop_int_nodes: ratio(num_int_nodes as f64, num_nodes as f64),
            num_edges,
            density: Self::density(num_nodes, num_edges, density),
            min_degree: if num_nodes == 0 { 0 } else { min_degree },
            max_degree,
            avg_degree: ratio(degree_sum as f64, num_nodes as f64),
            num_components,
            treewidth_lb: None,
            treewidth_ub: None,
            torso_width_lb: None,
            torso_width_ub: None,
            tree_depth_lb: None,
            tree_depth_ub: None,
        })
    }

    fn density(num_nodes: NumNodes, num_edges: NumEdges, kind: DensityKind) -> f64 {
        match kind {
            DensityKind::Pairwise if num_nodes <= 1 => 0.0,
            DensityKind::Pairwise => {
                let n = num_nodes as f64;
                2.0 * num_edges as f64 / (n * (n - 1.0))
            }
            DensityKind::Bipartite { rows, columns } => {
                ratio(num_edges as f64, rows as f64 * columns as f64)
            }
        }
    }

    pub fn set_treewidth(&mut self, lower: Option<usize>, upper: Option<usize>) {
        self.treewidth_lb = lower;
        self.treewidth_ub = upper;
    }

    pub fn set_torso_width(&mut self, lower: Option<usize>, upper: Option<usize>) {
        self.torso_width_lb = lower;
        self.torso_width_ub = upper;
    }

    pub fn set_tree_depth(&mut self, lower: Option<usize>, upper: Option<usize>) {
        self.tree_depth_lb = lower;
        self.tree_depth_ub = upper;
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
