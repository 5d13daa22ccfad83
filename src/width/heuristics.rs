use fxhash::FxHashSet;
use itertools::Itertools;
use smallvec::SmallVec;

use super::*;

/// Mutable working copy for elimination and contraction heuristics.
/// Nodes are renumbered densely; removed nodes are only flagged.
struct EliminationGraph {
    nbs: Vec<FxHashSet<Node>>,
    alive: Vec<bool>,
}

impl EliminationGraph {
    fn new(graph: &LabelledGraph, ticker: &mut Ticker) -> Result<Self, Cancelled> {
        let vertices = graph.vertices().collect_vec();
        let mut mapping = vec![INVALID_NODE; graph.capacity()];
        for (new, &old) in vertices.iter().enumerate() {
            mapping[old as usize] = new as Node;
        }

        let mut nbs = Vec::with_capacity(vertices.len());
        for &u in &vertices {
            ticker.tick()?;
            nbs.push(
                graph
                    .neighbors_of(u)
                    .map(|v| mapping[v as usize])
                    .collect::<FxHashSet<Node>>(),
            );
        }

        Ok(Self {
            alive: vec![true; nbs.len()],
            nbs,
        })
    }

    fn degree(&self, u: Node) -> usize {
        self.nbs[u as usize].len()
    }

    fn neighbors(&self, u: Node) -> SmallVec<[Node; 16]> {
        self.nbs[u as usize].iter().copied().collect()
    }

    /// Returns the alive node minimizing `key`; ties go to the smallest index
    fn select_min<K, F>(&self, ticker: &mut Ticker, mut key: F) -> Result<Option<Node>, Cancelled>
    where
        K: Ord,
        F: FnMut(Node, &mut Ticker) -> Result<K, Cancelled>,
    {
        let mut best: Option<(K, Node)> = None;
        for u in 0..self.nbs.len() as Node {
            ticker.tick()?;
            if !self.alive[u as usize] {
                continue;
            }
            let k = key(u, ticker)?;
            if best.as_ref().is_none_or(|(bk, _)| k < *bk) {
                best = Some((k, u));
            }
        }
        Ok(best.map(|(_, u)| u))
    }

    fn min_degree_node(&self, ticker: &mut Ticker) -> Result<Option<Node>, Cancelled> {
        self.select_min(ticker, |u, _| Ok(self.degree(u)))
    }

    /// Number of edges missing for the neighborhood of `u` to be a clique
    fn fill_in(&self, u: Node, ticker: &mut Ticker) -> Result<usize, Cancelled> {
        let nbs = self.neighbors(u);
        let mut missing = 0;
        for (i, &v) in nbs.iter().enumerate() {
            for &w in &nbs[i + 1..] {
                ticker.tick()?;
                missing += !self.nbs[v as usize].contains(&w) as usize;
            }
        }
        Ok(missing)
    }

    fn remove(&mut self, u: Node) {
        let nbs = std::mem::take(&mut self.nbs[u as usize]);
        for v in nbs {
            self.nbs[v as usize].remove(&u);
        }
        self.alive[u as usize] = false;
    }

    /// Turns the neighborhood of `u` into a clique and removes `u`
    fn eliminate(&mut self, u: Node, ticker: &mut Ticker) -> Result<(), Cancelled> {
        let nbs = self.neighbors(u);
        for (i, &v) in nbs.iter().enumerate() {
            for &w in &nbs[i + 1..] {
                ticker.tick()?;
                self.nbs[v as usize].insert(w);
                self.nbs[w as usize].insert(v);
            }
        }
        self.remove(u);
        Ok(())
    }

    /// Contracts the edge `{u, v}` into `v`
    fn contract(&mut self, u: Node, v: Node, ticker: &mut Ticker) -> Result<(), Cancelled> {
        for w in self.neighbors(u) {
            ticker.tick()?;
            if w != v {
                self.nbs[w as usize].insert(v);
                self.nbs[v as usize].insert(w);
            }
        }
        self.remove(u);
        Ok(())
    }
}

/// Maximum over all contraction steps of the minimum degree, contracting a minimum degree node
/// into its minimum degree neighbor.
fn minor_min_width(graph: &mut EliminationGraph, ticker: &mut Ticker) -> Result<usize, Cancelled> {
    let mut bound = 0;
    while let Some(u) = graph.min_degree_node(ticker)? {
        bound = bound.max(graph.degree(u));
        let target = graph.nbs[u as usize]
            .iter()
            .copied()
            .min_by_key(|&v| (graph.degree(v), v));
        match target {
            Some(v) => graph.contract(u, v, ticker)?,
            None => graph.remove(u),
        }
    }
    Ok(bound)
}

fn degeneracy(graph: &mut EliminationGraph, ticker: &mut Ticker) -> Result<usize, Cancelled> {
    let mut bound = 0;
    while let Some(u) = graph.min_degree_node(ticker)? {
        bound = bound.max(graph.degree(u));
        graph.remove(u);
    }
    Ok(bound)
}

fn greedy_degree(graph: &mut EliminationGraph, ticker: &mut Ticker) -> Result<usize, Cancelled> {
    let mut bound = 0;
    while let Some(u) = graph.min_degree_node(ticker)? {
        bound = bound.max(graph.degree(u));
        graph.eliminate(u, ticker)?;
    }
    Ok(bound)
}

fn greedy_fill_in(graph: &mut EliminationGraph, ticker: &mut Ticker) -> Result<usize, Cancelled> {
    let mut bound = 0;
    loop {
        let next = {
            let g = &*graph;
            g.select_min(ticker, |u, t| Ok((g.fill_in(u, t)?, g.degree(u))))?
        };
        let Some(u) = next else {
            break;
        };
        bound = bound.max(graph.degree(u));
        graph.eliminate(u, ticker)?;
    }
    Ok(bound)
}

macro_rules! elimination_bound {
    ($(#[$doc:meta])* $name:ident, $kind:expr, $compute:ident) => {
        $(#[$doc])*
        #[derive(Debug, Default, Clone)]
        pub struct $name {
            input: Option<LabelledGraph>,
            result: Option<usize>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl TreewidthBound for $name {
            fn kind(&self) -> BoundKind {
                $kind
            }

            fn set_input(&mut self, graph: LabelledGraph) {
                self.input = Some(graph);
                self.result = None;
            }

            fn run(&mut self, cancel: &CancelToken) -> Result<(), Cancelled> {
                cancel.check()?;
                let Some(graph) = self.input.as_ref() else {
                    return Ok(());
                };
                let mut ticker = cancel.ticker();
                let mut work = EliminationGraph::new(graph, &mut ticker)?;
                self.result = Some($compute(&mut work, &mut ticker)?);
                Ok(())
            }

            fn bound(&self) -> Option<usize> {
                self.result
            }
        }
    };
}

elimination_bound!(
    /// Treewidth lower bound by the *minor-min-width* heuristic:
    /// the minimum degree of a graph bounds the treewidth of every graph containing it as a minor.
    MinorMinWidth,
    BoundKind::Lower,
    minor_min_width
);

elimination_bound!(
    /// Treewidth lower bound by the degeneracy of the graph
    Degeneracy,
    BoundKind::Lower,
    degeneracy
);

elimination_bound!(
    /// Treewidth upper bound by the width of a minimum-degree elimination ordering
    GreedyDegree,
    BoundKind::Upper,
    greedy_degree
);

elimination_bound!(
    /// Treewidth upper bound by the width of a minimum-fill-in elimination ordering.
    /// Ties are broken by degree.
    GreedyFillIn,
    BoundKind::Upper,
    greedy_fill_in
);

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;
    use rstest::rstest;

    use super::*;
    use crate::testing::*;

    fn all_bounds() -> Vec<Box<dyn TreewidthBound>> {
        vec![
            Box::new(MinorMinWidth::new()),
            Box::new(Degeneracy::new()),
            Box::new(GreedyDegree::new()),
            Box::new(GreedyFillIn::new()),
        ]
    }

    fn evaluate(algo: &mut dyn TreewidthBound, graph: &LabelledGraph) -> Option<usize> {
        algo.set_input(graph.clone());
        algo.run(&CancelToken::new()).unwrap();
        algo.bound()
    }

    fn cycle(n: NumNodes) -> LabelledGraph {
        graph_from_edges(n, |_| true, (0..n).map(|u| (u, (u + 1) % n)))
    }

    fn clique(n: NumNodes) -> LabelledGraph {
        graph_from_edges(n, |_| true, (0..n).tuple_combinations::<(_, _)>())
    }

    #[rstest]
    #[case(graph_from_edges(1, |_| true, Vec::<Edge>::new()), 0)]
    #[case(graph_from_edges(6, |_| true, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]), 1)]
    #[case(graph_from_edges(7, |_| true, [(0, 1), (0, 2), (1, 3), (1, 4), (2, 5), (2, 6)]), 1)]
    #[case(cycle(9), 2)]
    #[case(clique(6), 5)]
    fn exact_on_simple_classes(#[case] graph: LabelledGraph, #[case] treewidth: usize) {
        for mut algo in all_bounds() {
            assert_eq!(evaluate(algo.as_mut(), &graph), Some(treewidth));
        }
    }

    #[test]
    fn lower_never_exceeds_upper() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x7e57);
        for n in [5, 12, 25] {
            for p in [0.1, 0.3, 0.6] {
                let graph = random_graph(rng, n, p, 0.5);
                let bounds = all_bounds()
                    .into_iter()
                    .map(|mut algo| (algo.kind(), evaluate(algo.as_mut(), &graph).unwrap()))
                    .collect_vec();

                let max_lower = bounds
                    .iter()
                    .filter(|(k, _)| *k == BoundKind::Lower)
                    .map(|(_, b)| *b)
                    .max();
                let min_upper = bounds
                    .iter()
                    .filter(|(k, _)| *k == BoundKind::Upper)
                    .map(|(_, b)| *b)
                    .min();
                assert!(max_lower <= min_upper, "{bounds:?}");
                assert!(min_upper.unwrap() < n as usize);
            }
        }
    }

    #[test]
    fn ignores_removed_nodes() {
        let mut graph = clique(5);
        graph.remove_node(2);
        for mut algo in all_bounds() {
            assert_eq!(evaluate(algo.as_mut(), &graph), Some(3));
        }
    }

    #[test]
    fn no_bound_before_run_or_after_cancel() {
        let token = CancelToken::new();
        token.cancel();
        for mut algo in all_bounds() {
            assert_eq!(algo.bound(), None);
            algo.set_input(clique(20));
            assert_eq!(algo.run(&token), Err(Cancelled));
            assert_eq!(algo.bound(), None);
        }
    }
}
