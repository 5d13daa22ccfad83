use super::*;

/// Generator of the **incidence graph**: nodes `0..n` represent the variables, followed by one node
/// per participating row (named [`ROW_NODE_PREFIX`] + row name, always flagged integer).
/// A row node is adjacent to every variable with an entry in that row.
#[derive(Debug, Copy, Clone, Default)]
pub struct IncidenceGraph {
    include_objective: bool,
}

impl IncidenceGraph {
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

impl LpGraphGenerator for IncidenceGraph {
    fn generate(
        &self,
        lp: &LinearProgram,
        cancel: &CancelToken,
    ) -> Result<LabelledGraph, Cancelled> {
        let mut ticker = cancel.ticker();
        let mut graph = LabelledGraph::with_capacity(lp.number_of_variables() + lp.rows().len());
        for var in lp.variables() {
            ticker.tick()?;
            graph.add_node(var.name.as_str(), var.is_integer());
        }

        for row in row_set(lp, self.include_objective) {
            ticker.tick()?;
            let mut label = NodeLabel::new(format!("{ROW_NODE_PREFIX}{}", row.name), true);
            let r = loop {
                match graph.try_add_node(label.clone()) {
                    Ok(r) => break r,
                    // a variable is literally called `row:<name>`
                    Err(_) => label.name.push('\''),
                }
            };
            for var in row.variables() {
                ticker.tick()?;
                graph.try_add_edge(r, var as Node);
            }
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_and_variable_with_equal_names() {
        let mut lp = LinearProgram::new();
        let obj = lp.add_row("obj", RowKind::Objective);
        let c = lp.add_row("x", RowKind::Constraint(Relation::Equal));
        let x = lp.add_variable("x", VarType::Continuous);
        let y = lp.add_variable("y", VarType::Integer);
        lp.add_entry(c, x, 1.0);
        lp.add_entry(c, y, 1.0);
        lp.add_entry(obj, y, 1.0);

        let token = CancelToken::new();
        let graph = IncidenceGraph::new().generate(&lp, &token).unwrap();
        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(graph.number_of_edges(), 2);
        let row = graph.node_by_name("row:x").unwrap();
        assert!(graph.is_integer(row));
        assert!(graph.has_edge(row, graph.node_by_name("x").unwrap()));

        let graph = IncidenceGraph::new()
            .include_objective(true)
            .generate(&lp, &token)
            .unwrap();
        assert_eq!(graph.number_of_nodes(), 4);
        assert_eq!(graph.number_of_edges(), 3);
    }
}
