use std::collections::VecDeque;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use super::*;

/// Number of random walks performed by default
pub const DEFAULT_TREE_DEPTH_TRIALS: usize = 1000;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDepthBounds {
    pub lower: usize,
    /// `None` if no depth-first search covered the whole graph
    pub upper: Option<usize>,
}

/// Randomized tree-depth bounds.
///
/// Each trial grows a simple path by a random walk from a random start node: the walk is
/// extended at its back end until stuck, then at its front end. A graph containing a path on
/// `L` nodes has tree-depth at least `⌈log2(L + 1)⌉`, which yields the lower bound.
///
/// Every `max(1, trials / 100)`-th trial (starting with the first) additionally roots a
/// depth-first search at the middle node of the path; the height of a DFS tree spanning the
/// graph is an upper bound.
#[derive(Debug, Clone, Copy)]
pub struct TreeDepth {
    trials: usize,
    seed: Option<u64>,
}

impl Default for TreeDepth {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TREE_DEPTH_TRIALS,
            seed: None,
        }
    }
}

impl TreeDepth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_trials(&mut self, trials: usize) {
        self.trials = trials.max(1);
    }

    /// Seeds the random walks; without a seed, a fresh one is drawn from the OS
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// Updates the number of trials; at least one trial is performed
    pub fn trials(mut self, trials: usize) -> Self {
        self.set_trials(trials);
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.set_seed(seed);
        self
    }

    fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_os_rng(),
        }
    }

    /// Bounds the tree-depth of `graph`. The upper bound is only available if `graph` is connected.
    /// The empty graph has tree-depth `0`.
    pub fn compute(
        &self,
        graph: &LabelledGraph,
        cancel: &CancelToken,
    ) -> Result<TreeDepthBounds, Cancelled> {
        self.compute_with(graph, &mut self.rng(0), cancel)
    }

    /// Bounds the tree-depth of a graph given by its connected components.
    /// Both bounds are the maximum over the components; the upper bound is `None` if any
    /// component has none.
    pub fn compute_components(
        &self,
        components: &[LabelledGraph],
        cancel: &CancelToken,
    ) -> Result<TreeDepthBounds, Cancelled> {
        let mut result = TreeDepthBounds {
            lower: 0,
            upper: Some(0),
        };
        for (idx, component) in components.iter().enumerate() {
            let bounds = self.compute_with(component, &mut self.rng(idx as u64), cancel)?;
            result.lower = result.lower.max(bounds.lower);
            result.upper = result.upper.zip(bounds.upper).map(|(a, b)| a.max(b));
        }
        Ok(result)
    }

    fn compute_with<R: Rng>(
        &self,
        graph: &LabelledGraph,
        rng: &mut R,
        cancel: &CancelToken,
    ) -> Result<TreeDepthBounds, Cancelled> {
        let vertices: Vec<Node> = graph.vertices().collect();
        if vertices.is_empty() {
            return Ok(TreeDepthBounds {
                lower: 0,
                upper: Some(0),
            });
        }

        let mut ticker = cancel.ticker();
        let mut on_path = vec![false; graph.capacity()];
        let mut path = VecDeque::new();
        let stride = (self.trials / 100).max(1);

        let mut longest = 0;
        let mut upper: Option<usize> = None;
        for trial in 0..self.trials.max(1) {
            let Some(&start) = vertices.choose(rng) else {
                break;
            };
            on_path[start as usize] = true;
            path.push_back(start);

            for at_back in [true, false] {
                loop {
                    ticker.tick()?;
                    let end = if at_back { path.back() } else { path.front() };
                    let Some(&end) = end else {
                        break;
                    };
                    let candidates: SmallVec<[Node; 8]> = graph
                        .neighbors_of(end)
                        .filter(|&v| !on_path[v as usize])
                        .collect();
                    let Some(&next) = candidates.choose(rng) else {
                        break;
                    };
                    on_path[next as usize] = true;
                    if at_back {
                        path.push_back(next);
                    } else {
                        path.push_front(next);
                    }
                }
            }

            longest = longest.max(path.len());
            if trial % stride == 0 {
                let middle = path[path.len() / 2];
                if let Some(height) = graph.dfs_tree_height(middle, cancel)? {
                    let height = height as usize;
                    upper = Some(upper.map_or(height, |h| h.min(height)));
                }
            }

            for u in path.drain(..) {
                on_path[u as usize] = false;
            }
        }

        let lower = (usize::BITS - longest.leading_zeros()) as usize;
        trace!(longest, lower, ?upper, "Tree-depth trials finished");
        Ok(TreeDepthBounds { lower, upper })
    }
}
