/*!
# Instance Pipeline

Runs the full analysis of a single instance on the calling thread:
parse → per representation: generate → statistics → width parameters.

Graph generation of a representation completes before any width algorithm consumes it; every
width algorithm works on its own copy of the components, so representations are independent.
Cancellation at any stage unwinds with [`AnalysisError::Cancelled`] and nothing partial is returned.
*/

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    algo::*,
    config::AnalysisConfig,
    error::AnalysisError,
    gens::GraphRepresentation,
    lp::{LinearProgram, LpStatistics, MpsReader},
    prelude::*,
    stats::GraphStatistics,
    width::*,
};

/// Everything computed for a single instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceAnalysis {
    /// Value of the `NAME` section, if any
    pub name: Option<String>,
    pub lp: LpStatistics,
    /// One entry per configured representation, in configuration order
    pub graphs: Vec<GraphStatistics>,
}

impl InstanceAnalysis {
    pub fn graph(&self, representation: GraphRepresentation) -> Option<&GraphStatistics> {
        self.graphs
            .iter()
            .find(|stats| stats.representation == representation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: AnalysisConfig,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Reads the MPS file at `path` and analyzes it
    pub fn analyze_file<P: AsRef<Path>>(
        &self,
        path: P,
        cancel: &CancelToken,
    ) -> Result<InstanceAnalysis, AnalysisError> {
        let lp = MpsReader::new()
            .format(self.config.mps_format)
            .try_read_lp_file(path, cancel)?;
        Ok(self.analyze_lp(&lp, cancel)?)
    }

    /// Analyzes an already parsed linear program
    pub fn analyze_lp(
        &self,
        lp: &LinearProgram,
        cancel: &CancelToken,
    ) -> Result<InstanceAnalysis, Cancelled> {
        let lp_stats = match lp.statistics() {
            Some(stats) => stats.clone(),
            None => LpStatistics::compute(lp, cancel)?,
        };

        let mut graphs = Vec::with_capacity(self.config.representations.len());
        for &representation in &self.config.representations {
            graphs.push(self.analyze_representation(lp, representation, cancel)?);
        }

        Ok(InstanceAnalysis {
            name: lp.name().map(String::from),
            lp: lp_stats,
            graphs,
        })
    }

    /// Generates a single representation and computes its statistics and configured widths
    pub fn analyze_representation(
        &self,
        lp: &LinearProgram,
        representation: GraphRepresentation,
        cancel: &CancelToken,
    ) -> Result<GraphStatistics, Cancelled> {
        cancel.check()?;
        let config = &self.config;
        let graph = representation.generate(lp, config.include_objective, cancel)?;
        let density = representation.density_kind(lp, config.include_objective);
        let mut stats = GraphStatistics::compute(&graph, representation, density, cancel)?;
        debug!(
            %representation,
            nodes = stats.num_nodes,
            edges = stats.num_edges,
            components = stats.num_components,
            "Generated graph"
        );

        if !config.computes_widths() {
            return Ok(stats);
        }

        let components = graph.split_into_components(cancel)?;
        drop(graph);

        if config.treewidth {
            let bounds = treewidth_bounds(
                &components,
                config.lower_bound,
                config.upper_bound,
                cancel,
            )?;
            debug!(%representation, ?bounds, "Treewidth");
            stats.set_treewidth(bounds.lower, bounds.upper);
        }

        if config.torso_width {
            let bounds = TorsoWidth::new()
                .lower_bound(config.lower_bound)
                .upper_bound(config.upper_bound)
                .compute(&components, cancel)?;
            debug!(%representation, ?bounds, "Torso-width");
            stats.set_torso_width(bounds.lower, bounds.upper);
        }

        if config.tree_depth {
            let bounds = TreeDepth::new()
                .trials(config.tree_depth_trials)
                .seed(config.seed)
                .compute_components(&components, cancel)?;
            debug!(%representation, ?bounds, "Tree-depth");
            stats.set_tree_depth(Some(bounds.lower), bounds.upper);
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::lp::MpsFormat;

    const SMALL: &str = "\
NAME small
ROWS
 N obj
 L c1
 E c2
COLUMNS
 MARKER 'MARKER' 'INTORG'
 x obj 1 c1 1
 y c1 1 c2 1
 MARKER 'MARKER' 'INTEND'
 z c2 1 obj 2
RHS
 RHS c1 4 c2 1
ENDATA
";

    fn small_lp() -> LinearProgram {
        MpsReader::new()
            .format(MpsFormat::Free)
            .try_read_lp(Cursor::new(SMALL), &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn analyzes_configured_representations() {
        let config = AnalysisConfig {
            representations: vec![GraphRepresentation::Dual, GraphRepresentation::Primal],
            seed: Some(1),
            tree_depth_trials: 20,
            ..Default::default()
        };
        let analysis = Pipeline::new(config)
            .analyze_lp(&small_lp(), &CancelToken::new())
            .unwrap();

        assert_eq!(analysis.name.as_deref(), Some("small"));
        assert_eq!(analysis.lp.num_int_vars, 2);
        assert_eq!(analysis.graphs.len(), 2);
        assert_eq!(analysis.graphs[0].representation, GraphRepresentation::Dual);

        // x - y - z
        let primal = analysis.graph(GraphRepresentation::Primal).unwrap();
        assert_eq!((primal.num_nodes, primal.num_edges), (3, 2));
        assert_eq!((primal.treewidth_lb, primal.treewidth_ub), (Some(1), Some(1)));
        assert_eq!(primal.tree_depth_lb, Some(2));
        // z is continuous: x - y remains
        assert_eq!((primal.torso_width_lb, primal.torso_width_ub), (Some(1), Some(1)));

        let dual = analysis.graph(GraphRepresentation::Dual).unwrap();
        assert_eq!((dual.num_nodes, dual.num_edges), (2, 1));
        assert!(analysis.graph(GraphRepresentation::Incidence).is_none());
    }

    #[test]
    fn widths_can_be_disabled() {
        let config = AnalysisConfig {
            representations: vec![GraphRepresentation::Incidence],
            treewidth: false,
            torso_width: false,
            tree_depth: false,
            ..Default::default()
        };
        let analysis = Pipeline::new(config)
            .analyze_lp(&small_lp(), &CancelToken::new())
            .unwrap();
        let incidence = &analysis.graphs[0];
        assert_eq!((incidence.num_nodes, incidence.num_edges), (5, 4));
        assert_eq!(incidence.treewidth_ub, None);
        assert_eq!(incidence.tree_depth_lb, None);
    }

    #[test]
    fn errors_and_cancellation() {
        let pipeline = Pipeline::default();
        let token = CancelToken::new();
        assert!(matches!(
            pipeline.analyze_file("/nonexistent/instance.mps", &token),
            Err(AnalysisError::Mps(_))
        ));

        token.cancel();
        assert_eq!(
            pipeline.analyze_lp(&small_lp(), &token).unwrap_err(),
            Cancelled
        );
    }
}
