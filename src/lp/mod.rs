/*!
# Linear Programs

In-memory model of a (Mixed) Integer Linear Program together with a reader and a writer for the
**MPS** format.

An MPS file consists of the sections `NAME`, `ROWS`, `COLUMNS`, `RHS`, `RANGES`, `BOUNDS` and
`ENDATA` in this order. Section headers start in column 1; data lines start with whitespace.
Lines starting with `*` are comments.

```text
NAME          EXAMPLE
ROWS
 N  COST
 L  LIM1
COLUMNS
    MARKER                 'MARKER'                 'INTORG'
    X1        COST               1.0   LIM1               1.0
    MARKER                 'MARKER'                 'INTEND'
    X2        LIM1               1.0
RHS
    RHS       LIM1               4.0
BOUNDS
 UP BND       X1                 4.0
ENDATA
```

Two layouts are supported (see [`MpsFormat`]): the classic **fixed** layout, where every field
occupies fixed columns (2-3, 5-12, 15-22, 25-36, 40-47, 50-61), and the **free** layout, where fields
are separated by whitespace and names must not contain spaces.

# Example
```
use mipgraphs::{cancel::CancelToken, lp::*};
use std::io::Cursor;

let data = "NAME test\nROWS\n N obj\n L c1\nCOLUMNS\n x obj 1 c1 2\n y c1 3\nRHS\n rhs c1 4\nENDATA\n";
let lp = MpsReader::new()
    .format(MpsFormat::Free)
    .try_read_lp(Cursor::new(data), &CancelToken::new())
    .unwrap();

assert_eq!(lp.number_of_variables(), 2);
assert_eq!(lp.row_by_name("c1").unwrap().entries.len(), 2);
assert_eq!(lp.statistics().unwrap().num_cons, 1);
```
*/

mod model;
mod reader;
mod statistics;
mod writer;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use model::*;
pub use reader::*;
pub use statistics::*;
pub use writer::*;

/// Column layout of an MPS file
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MpsFormat {
    /// Fields at fixed columns; names may contain spaces
    #[default]
    Fixed,
    /// Fields separated by whitespace
    Free,
}

impl FromStr for MpsFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(MpsFormat::Fixed),
            "free" => Ok(MpsFormat::Free),
            _ => Err(format!("Unknown MPS format: {s}")),
        }
    }
}

/// Byte ranges of the six fixed-layout fields
pub(crate) const FIXED_FIELDS: [(usize, usize); 6] =
    [(1, 3), (4, 12), (14, 22), (24, 36), (39, 47), (49, 61)];

/// Bound codes that require a value
pub(crate) fn bound_takes_value(code: &str) -> bool {
    matches!(code, "UP" | "LO" | "FX" | "LI" | "UI" | "SC")
}
