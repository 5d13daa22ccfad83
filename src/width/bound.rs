use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::*;

/// Direction of a treewidth bound
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BoundKind {
    Lower,
    Upper,
}

/// Capability interface of a treewidth bound algorithm for a single **connected** graph.
///
/// An instance is configured with [`TreewidthBound::set_input`], executed once with
/// [`TreewidthBound::run`] and queried with [`TreewidthBound::bound`]. Implementations must poll
/// the token inside every loop whose length depends on the input.
pub trait TreewidthBound: Send {
    /// Whether [`TreewidthBound::bound`] is a lower or an upper bound
    fn kind(&self) -> BoundKind;

    /// Hands the input graph to the algorithm; clears any previous result
    fn set_input(&mut self, graph: LabelledGraph);

    /// Computes the bound
    fn run(&mut self, cancel: &CancelToken) -> Result<(), Cancelled>;

    /// Returns the computed bound or `None` if the algorithm did not produce one
    fn bound(&self) -> Option<usize>;
}

/// Treewidth lower bound heuristics
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LowerBoundAlgorithm {
    #[default]
    MinorMinWidth,
    Degeneracy,
}

impl LowerBoundAlgorithm {
    /// Creates a fresh instance of the selected algorithm
    pub fn create(&self) -> Box<dyn TreewidthBound> {
        match self {
            LowerBoundAlgorithm::MinorMinWidth => Box::new(MinorMinWidth::new()),
            LowerBoundAlgorithm::Degeneracy => Box::new(Degeneracy::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LowerBoundAlgorithm::MinorMinWidth => "minor-min-width",
            LowerBoundAlgorithm::Degeneracy => "degeneracy",
        }
    }
}

/// Treewidth upper bound heuristics
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpperBoundAlgorithm {
    #[default]
    GreedyDegree,
    GreedyFillIn,
}

impl UpperBoundAlgorithm {
    /// Creates a fresh instance of the selected algorithm
    pub fn create(&self) -> Box<dyn TreewidthBound> {
        match self {
            UpperBoundAlgorithm::GreedyDegree => Box::new(GreedyDegree::new()),
            UpperBoundAlgorithm::GreedyFillIn => Box::new(GreedyFillIn::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            UpperBoundAlgorithm::GreedyDegree => "greedy-degree",
            UpperBoundAlgorithm::GreedyFillIn => "greedy-fill-in",
        }
    }
}

macro_rules! impl_algorithm_names {
    ($($algo:ident => [$($variant:ident),*]),*) => {
        $(
            impl Display for $algo {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.name())
                }
            }

            impl FromStr for $algo {
                type Err = String;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    [$($algo::$variant),*]
                        .into_iter()
                        .find(|algo| algo.name() == s.to_lowercase())
                        .ok_or_else(|| format!("Unknown algorithm: {s}"))
                }
            }
        )*
    };
}

impl_algorithm_names!(
    LowerBoundAlgorithm => [MinorMinWidth, Degeneracy],
    UpperBoundAlgorithm => [GreedyDegree, GreedyFillIn]
);

/// Lower and upper bound of a width parameter; `None` means no result
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthBounds {
    pub lower: Option<usize>,
    pub upper: Option<usize>,
}

/// Applies a single-graph bound algorithm to every connected component and combines the results.
///
/// The treewidth of a disconnected graph is the maximum treewidth of its components, so the
/// aggregate is the maximum of the per-component bounds. If a component yields no bound, the
/// aggregate is `None`; the remaining components are still evaluated. A graph without any
/// component has bound `0`.
pub struct ComponentwiseBound<F>
where
    F: Fn() -> Box<dyn TreewidthBound>,
{
    factory: F,
}

impl<F> ComponentwiseBound<F>
where
    F: Fn() -> Box<dyn TreewidthBound>,
{
    /// Creates the wrapper; `factory` is invoked once per component
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Computes the aggregate bound over `components`, which must each be connected
    pub fn run(
        &self,
        components: &[LabelledGraph],
        cancel: &CancelToken,
    ) -> Result<Option<usize>, Cancelled> {
        let mut aggregate = Some(0);
        for (idx, component) in components.iter().enumerate() {
            let mut algo = (self.factory)();
            algo.set_input(component.clone());
            algo.run(cancel)?;

            let bound = algo.bound();
            debug!(
                component = idx,
                nodes = component.number_of_nodes(),
                kind = ?algo.kind(),
                ?bound,
                "Component bound"
            );

            aggregate = match (aggregate, bound) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            };
        }
        Ok(aggregate)
    }
}

/// Computes lower and upper treewidth bounds of a graph given by its connected components
pub fn treewidth_bounds(
    components: &[LabelledGraph],
    lower: LowerBoundAlgorithm,
    upper: UpperBoundAlgorithm,
    cancel: &CancelToken,
) -> Result<WidthBounds, Cancelled> {
    Ok(WidthBounds {
        lower: ComponentwiseBound::new(|| lower.create()).run(components, cancel)?,
        upper: ComponentwiseBound::new(|| upper.create()).run(components, cancel)?,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::testing::*;

    /// Reports a fixed bound per input size
    struct Oracle {
        table: Vec<Option<usize>>,
        result: Option<usize>,
        input: Option<LabelledGraph>,
    }

    impl TreewidthBound for Oracle {
        fn kind(&self) -> BoundKind {
            BoundKind::Upper
        }

        fn set_input(&mut self, graph: LabelledGraph) {
            self.input = Some(graph);
            self.result = None;
        }

        fn run(&mut self, cancel: &CancelToken) -> Result<(), Cancelled> {
            cancel.check()?;
            let n = self.input.as_ref().map_or(0, |g| g.len());
            self.result = self.table[n];
            Ok(())
        }

        fn bound(&self) -> Option<usize> {
            self.result
        }
    }

    fn components(sizes: &[NumNodes]) -> Vec<LabelledGraph> {
        sizes
            .iter()
            .map(|&n| graph_from_edges(n, |_| true, (1..n).map(|u| (u - 1, u))))
            .collect()
    }

    #[rstest]
    #[case(&[1, 2, 3], vec![None, Some(0), Some(4), Some(2)], Some(4))]
    #[case(&[3, 3, 1], vec![None, Some(7), Some(4), Some(2)], Some(7))]
    #[case(&[1, 2], vec![None, Some(1), None, Some(2)], None)]
    #[case(&[], vec![None], Some(0))]
    fn aggregate_is_maximum(
        #[case] sizes: &[NumNodes],
        #[case] table: Vec<Option<usize>>,
        #[case] expected: Option<usize>,
    ) {
        let wrapper = ComponentwiseBound::new(|| {
            Box::new(Oracle {
                table: table.clone(),
                result: None,
                input: None,
            }) as Box<dyn TreewidthBound>
        });
        assert_eq!(
            wrapper.run(&components(sizes), &CancelToken::new()),
            Ok(expected)
        );
    }

    #[test]
    fn cancellation_propagates() {
        let token = CancelToken::new();
        token.cancel();
        let result = treewidth_bounds(
            &components(&[30]),
            LowerBoundAlgorithm::Degeneracy,
            UpperBoundAlgorithm::GreedyDegree,
            &token,
        );
        assert_eq!(result, Err(Cancelled));
    }

    #[test]
    fn algorithm_names_roundtrip() {
        for algo in [LowerBoundAlgorithm::MinorMinWidth, LowerBoundAlgorithm::Degeneracy] {
            assert_eq!(algo.to_string().parse(), Ok(algo));
        }
        for algo in [UpperBoundAlgorithm::GreedyDegree, UpperBoundAlgorithm::GreedyFillIn] {
            assert_eq!(algo.to_string().parse(), Ok(algo));
        }
        assert!("exact".parse::<UpperBoundAlgorithm>().is_err());
    }
}
