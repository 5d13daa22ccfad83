/*!
# Graph Representation

All graph representations of a linear program are undirected, simple and labelled:
every node knows the name and integrality of the variable (or row) it was derived from.
[`LabelledGraph`] is the single storage backend; algorithms are written against the
traits in [`ops`](crate::ops) so they do not depend on its internals.
*/

use crate::{cancel::*, ops::*, *};

mod labelled;
mod neighborhood;

pub use labelled::*;
pub use neighborhood::*;
