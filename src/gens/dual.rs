use super::*;

/// Generator of the **dual graph**: one node per participating row (always flagged integer),
/// and an edge between two rows iff they have entries for a common variable.
#[derive(Debug, Copy, Clone, Default)]
pub struct DualGraph {
    include_objective: bool,
}

impl DualGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_include_objective(&mut self, include: bool) {
        self.include_objective = include;
    }

    /// Updates whether the objective row participates
    pub fn include_objective(mut self, include: bool) -> Self {
        self.set_include_objective(include);
        self
    }
}

impl LpGraphGenerator for DualGraph {
    fn generate(
        &self,
        lp: &LinearProgram,
        cancel: &CancelToken,
    ) -> Result<LabelledGraph, Cancelled> {
        let mut ticker = cancel.ticker();
        let mut graph = LabelledGraph::with_capacity(lp.rows().len());
        let mut rows_of_var: Vec<Vec<Node>> = vec![Vec::new(); lp.number_of_variables()];

        for row in row_set(lp, self.include_objective) {
            ticker.tick()?;
            let r = graph.add_node(row.name.as_str(), true);
            for var in distinct_variables(row) {
                ticker.tick()?;
                rows_of_var[var].push(r);
            }
        }

        for rows in &rows_of_var {
            for (i, &r) in rows.iter().enumerate() {
                for &s in &rows[i + 1..] {
                    ticker.tick()?;
                    graph.try_add_edge(r, s);
                }
            }
        }

        Ok(graph)
    }
}
