/*!
# Graph Algorithms

Traversal and connectivity routines built on top of the operation traits in [`ops`](crate::ops).
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use mipgraphs::algo::*;
```
If possible, algorithms are provided as **iterators**, making it easy to consume results lazily.
Variants taking a [`CancelToken`] poll it once per visited node.
*/

mod connectivity;
mod traversal;

use crate::prelude::*;

pub use connectivity::*;
pub use traversal::*;
