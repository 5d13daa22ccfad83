/*!
# Width Parameters

Bounds on the treewidth, torso-width and tree-depth of a [`LabelledGraph`].

Treewidth bounds are computed by heuristics implementing [`TreewidthBound`] on single connected
graphs; [`ComponentwiseBound`] lifts them to arbitrary graphs given by their components:
```rust
use mipgraphs::{prelude::*, width::*};

let mut graph = LabelledGraph::new();
for i in 0..4 {
    graph.add_node(format!("x{i}"), i != 0);
}
graph.add_edges([(0, 1), (0, 2), (0, 3), (1, 2)]);

let token = CancelToken::new();
let components = graph.split_into_components(&token).unwrap();

let tw = treewidth_bounds(
    &components,
    LowerBoundAlgorithm::MinorMinWidth,
    UpperBoundAlgorithm::GreedyDegree,
    &token,
)
.unwrap();
assert_eq!(tw, WidthBounds { lower: Some(2), upper: Some(2) });

// contracting the continuous node `x0` turns {x1, x2, x3} into a triangle
let torso = TorsoWidth::new().compute(&components, &token).unwrap();
assert_eq!(torso.upper, Some(2));
```
*/

use crate::{algo::*, prelude::*};

mod bound;
mod heuristics;
mod torso;
mod treedepth;

pub use bound::*;
pub use heuristics::*;
pub use torso::*;
pub use treedepth::*;
