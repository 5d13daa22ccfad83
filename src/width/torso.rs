use std::collections::VecDeque;

use tracing::trace;

use super::*;

/// Computes the torso of a **connected** graph: every maximal connected set of continuous
/// nodes is removed and its integer neighborhood is made a clique.
///
/// Returns `None` if no integer node remains. The result is densely numbered, keeps the labels
/// of the surviving nodes and is again connected.
pub fn torso_of(
    graph: &LabelledGraph,
    cancel: &CancelToken,
) -> Result<Option<LabelledGraph>, Cancelled> {
    let mut ticker = cancel.ticker();
    let mut torso = graph.clone();

    let mut absorbed = vec![false; graph.capacity()];
    let mut in_boundary = vec![false; graph.capacity()];
    let mut continuous = Vec::new();
    let mut queue = VecDeque::new();

    for start in graph.vertices() {
        if graph.is_integer(start) || absorbed[start as usize] {
            continue;
        }

        let mut boundary = Vec::new();
        absorbed[start as usize] = true;
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            continuous.push(u);
            for v in graph.neighbors_of(u) {
                ticker.tick()?;
                if graph.is_integer(v) {
                    if !in_boundary[v as usize] {
                        in_boundary[v as usize] = true;
                        boundary.push(v);
                    }
                } else if !absorbed[v as usize] {
                    absorbed[v as usize] = true;
                    queue.push_back(v);
                }
            }
        }

        for &v in &boundary {
            in_boundary[v as usize] = false;
        }
        let added = torso.connect_clique(&boundary, &mut ticker)?;
        trace!(boundary = boundary.len(), added, "Contracted continuous region");
    }

    torso.remove_nodes(continuous, &mut ticker)?;
    if torso.is_empty() {
        return Ok(None);
    }
    torso.compacted(cancel).map(Some)
}

/// Computes the torsos of all connected components, dropping components without integer nodes
pub fn torsos(
    components: &[LabelledGraph],
    cancel: &CancelToken,
) -> Result<Vec<LabelledGraph>, Cancelled> {
    let mut result = Vec::with_capacity(components.len());
    for component in components {
        if let Some(torso) = torso_of(component, cancel)? {
            result.push(torso);
        }
    }
    Ok(result)
}

/// Bounds the **torso-width**, the treewidth of the torso, of a graph given by its
/// connected components. If no component retains an integer node, both bounds are `0`.
#[derive(Debug, Default, Copy, Clone)]
pub struct TorsoWidth {
    lower: LowerBoundAlgorithm,
    upper: UpperBoundAlgorithm,
}

impl TorsoWidth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_lower_bound(&mut self, algo: LowerBoundAlgorithm) {
        self.lower = algo;
    }

    pub fn set_upper_bound(&mut self, algo: UpperBoundAlgorithm) {
        self.upper = algo;
    }

    /// Updates the lower bound heuristic applied to the torso
    pub fn lower_bound(mut self, algo: LowerBoundAlgorithm) -> Self {
        self.set_lower_bound(algo);
        self
    }

    /// Updates the upper bound heuristic applied to the torso
    pub fn upper_bound(mut self, algo: UpperBoundAlgorithm) -> Self {
        self.set_upper_bound(algo);
        self
    }

    pub fn compute(
        &self,
        components: &[LabelledGraph],
        cancel: &CancelToken,
    ) -> Result<WidthBounds, Cancelled> {
        let torsos = torsos(components, cancel)?;
        trace!(
            components = components.len(),
            torsos = torsos.len(),
            "Computed torsos"
        );
        treewidth_bounds(&torsos, self.lower, self.upper, cancel)
    }
}
