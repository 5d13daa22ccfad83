use super::*;

/// Generator of the **primal graph**: one node per variable (node `i` represents variable `i`),
/// and an edge between two variables iff some participating row has entries for both.
#[derive(Debug, Copy, Clone, Default)]
pub struct PrimalGraph {
    include_objective: bool,
}

impl PrimalGraph {
    /// Creates a generator that ignores the objective row
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

impl LpGraphGenerator for PrimalGraph {
    fn generate(
        &self,
        lp: &LinearProgram,
        cancel: &CancelToken,
    ) -> Result<LabelledGraph, Cancelled> {
        let mut ticker = cancel.ticker();
        let mut graph = LabelledGraph::with_capacity(lp.number_of_variables());
        for var in lp.variables() {
            ticker.tick()?;
            graph.add_node(var.name.as_str(), var.is_integer());
        }

        for row in row_set(lp, self.include_objective) {
            let vars = distinct_variables(row);
            for (i, &u) in vars.iter().enumerate() {
                for &v in &vars[i + 1..] {
                    ticker.tick()?;
                    graph.try_add_edge(u as Node, v as Node);
                }
            }
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::gens::tests::random_lp;

    #[test]
    fn edges_iff_variables_share_a_row() {
        let rng = &mut Pcg64Mcg::seed_from_u64(21);
        let token = CancelToken::new();
        for _ in 0..10 {
            let lp = random_lp(rng, 20, 12, 0.25);
            let graph = PrimalGraph::new().generate(&lp, &token).unwrap();
            assert_eq!(graph.number_of_nodes() as usize, lp.number_of_variables());

            for a in 0..lp.number_of_variables() {
                assert_eq!(graph.name_of(a as Node), lp.variable(a).name);
                assert_eq!(graph.is_integer(a as Node), lp.variable(a).is_integer());
                for b in 0..lp.number_of_variables() {
                    let shared = a != b
                        && lp.constraints().any(|row| {
                            row.variables().any(|v| v == a) && row.variables().any(|v| v == b)
                        });
                    assert_eq!(graph.has_edge(a as Node, b as Node), shared);
                }
            }
        }
    }

    #[test]
    fn cancelled_generation() {
        let rng = &mut Pcg64Mcg::seed_from_u64(1);
        let lp = random_lp(rng, 40, 10, 0.8);
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(PrimalGraph::new().generate(&lp, &token), Err(Cancelled));
    }
}
