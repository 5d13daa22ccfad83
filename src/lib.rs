/*!
`mipgraphs` measures the structure of (Mixed) Integer Linear Programs through graph-width
parameters of graphs derived from their constraint matrix.

# Pipeline

An instance flows through
- the [`lp`] module, which reads an MPS file into a [`LinearProgram`](crate::lp::LinearProgram)
  and attaches [`LpStatistics`](crate::lp::LpStatistics),
- the [`gens`] module, which derives the **primal**, **incidence** or **dual** graph,
- the [`stats`] module, which computes descriptive [`GraphStatistics`](crate::stats::GraphStatistics),
- the [`width`] module, which bounds treewidth, torso-width and tree-depth,

orchestrated per instance by the [`pipeline`] and under a wall-clock deadline by the [`runner`].

# Representation

We represent **nodes** as `u32` indices into the arena of a [`LabelledGraph`](crate::repr::LabelledGraph).
Every node carries a [`NodeLabel`] with the name of the originating variable/row and an
integrality flag; names are the only link back to the [`LinearProgram`](crate::lp::LinearProgram).
For **edges**, we use a simple tuple-struct `Edge(Node, Node)`. All graphs are undirected and simple.

# Design

All algorithms/generators are provided as configurable structs that one can alter to their needs
using the *Builder* / *Setter* pattern before calling the configured algorithm on a provided graph.
Every loop whose length depends on the instance size polls a [`CancelToken`](crate::cancel::CancelToken),
so any computation can be aborted cooperatively once the instance deadline elapsed.

In most use-cases, `use mipgraphs::{prelude::*, algo::*};` suffices for your needs.
*/

pub mod algo;
pub mod cancel;
pub mod config;
pub mod edge;
pub mod error;
pub mod gens;
pub mod lp;
pub mod node;
pub mod ops;
pub mod pipeline;
pub mod report;
pub mod repr;
pub mod runner;
pub mod stats;
pub mod width;

#[cfg(test)]
pub(crate) mod testing;

pub use edge::*;
pub use node::*;

/// `mipgraphs::prelude` includes definitions for nodes and edges, all basic graph operation traits,
/// the graph representation and the cancellation primitives.
pub mod prelude {
    pub use super::{cancel::*, edge::*, node::*, ops::*, repr::*};
}
