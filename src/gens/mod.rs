/*!
# Graph Generators

This module derives undirected graphs from the constraint matrix of a [`LinearProgram`].

Each generator is a configurable struct that one alters using the *Builder* / *Setter* pattern
before calling [`LpGraphGenerator::generate`]. The typical usage workflow is:

1. Create a generator instance (e.g., `PrimalGraph::new()`).
2. Decide whether the objective row participates (`.include_objective(true)`).
3. Generate the graph via `generate(&lp, &token)`.

Supported representations:
- **Primal**: one node per variable, an edge between two variables iff they share a row
- **Incidence**: one node per variable and per row, an edge iff the variable has an entry in the row
- **Dual**: one node per row, an edge between two rows iff they share a variable

Generation is deterministic for a given [`LinearProgram`] and polls the [`CancelToken`] once per
inserted edge.

```
use mipgraphs::{prelude::*, gens::*, lp::*};

let mut lp = LinearProgram::new();
let obj = lp.add_row("obj", RowKind::Objective);
let c1 = lp.add_row("c1", RowKind::Constraint(Relation::LessEq));
let x = lp.add_variable("x", VarType::Integer);
let y = lp.add_variable("y", VarType::Continuous);
let z = lp.add_variable("z", VarType::Continuous);
lp.add_entry(c1, x, 1.0);
lp.add_entry(c1, y, 1.0);
lp.add_entry(obj, z, 1.0);
lp.add_entry(obj, x, 1.0);

let token = CancelToken::new();
let graph = PrimalGraph::new().generate(&lp, &token).unwrap();
assert_eq!(graph.number_of_edges(), 1);

let graph = PrimalGraph::new().include_objective(true).generate(&lp, &token).unwrap();
assert_eq!(graph.number_of_edges(), 2);
```
*/

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{lp::*, prelude::*};

mod dual;
mod incidence;
mod primal;

pub use dual::*;
pub use incidence::*;
pub use primal::*;

/// Prefix of incidence-graph row nodes, which keeps rows and variables sharing a name apart
pub const ROW_NODE_PREFIX: &str = "row:";

/// The three supported graph representations of a linear program
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphRepresentation {
    Primal,
    Incidence,
    Dual,
}

impl GraphRepresentation {
    pub const ALL: [GraphRepresentation; 3] = [
        GraphRepresentation::Primal,
        GraphRepresentation::Incidence,
        GraphRepresentation::Dual,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GraphRepresentation::Primal => "primal",
            GraphRepresentation::Incidence => "incidence",
            GraphRepresentation::Dual => "dual",
        }
    }

    /// Generates the graph of `lp` in this representation
    pub fn generate(
        &self,
        lp: &LinearProgram,
        include_objective: bool,
        cancel: &CancelToken,
    ) -> Result<LabelledGraph, Cancelled> {
        match self {
            GraphRepresentation::Primal => PrimalGraph::new()
                .include_objective(include_objective)
                .generate(lp, cancel),
            GraphRepresentation::Incidence => IncidenceGraph::new()
                .include_objective(include_objective)
                .generate(lp, cancel),
            GraphRepresentation::Dual => DualGraph::new()
                .include_objective(include_objective)
                .generate(lp, cancel),
        }
    }

    /// Returns how the density of a graph in this representation is normalized
    pub fn density_kind(&self, lp: &LinearProgram, include_objective: bool) -> DensityKind {
        match self {
            GraphRepresentation::Incidence => DensityKind::Bipartite {
                rows: row_set(lp, include_objective).count(),
                columns: lp.number_of_variables(),
            },
            _ => DensityKind::Pairwise,
        }
    }
}

impl Display for GraphRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for GraphRepresentation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "primal" => Ok(GraphRepresentation::Primal),
            "incidence" => Ok(GraphRepresentation::Incidence),
            "dual" => Ok(GraphRepresentation::Dual),
            _ => Err(format!("Unknown graph representation: {s}")),
        }
    }
}

/// Normalization of the edge density
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DensityKind {
    /// `2|E| / (|V| (|V| - 1))`
    Pairwise,
    /// `|E| / (rows * columns)`
    Bipartite { rows: usize, columns: usize },
}

/// Trait for generators deriving a graph from a [`LinearProgram`]
pub trait LpGraphGenerator {
    /// Derives the graph. Node names are taken from the variables/rows they represent.
    fn generate(&self, lp: &LinearProgram, cancel: &CancelToken)
    -> Result<LabelledGraph, Cancelled>;
}

/// Rows participating in a graph: all constraints, plus the objective if `include_objective`.
/// Rows keep their declaration order.
pub fn row_set(lp: &LinearProgram, include_objective: bool) -> impl Iterator<Item = &Row> + '_ {
    lp.rows()
        .iter()
        .filter(move |row| include_objective || !row.is_objective())
}

/// Returns the distinct variables of `row` in ascending order
pub(crate) fn distinct_variables(row: &Row) -> Vec<VarId> {
    let mut vars: Vec<VarId> = row.variables().collect();
    vars.sort_unstable();
    vars.dedup();
    vars
}
