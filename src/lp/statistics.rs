use serde::{Deserialize, Serialize};

use super::*;
use crate::cancel::{CancelToken, Cancelled};

/// Descriptive statistics of a [`LinearProgram`], attached by the reader after a successful parse.
///
/// Coefficient extrema are taken over the absolute values of constraint entries and are
/// `None` if no constraint has an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpStatistics {
    pub num_vars: usize,
    pub num_cons: usize,
    pub num_int_vars: usize,
    pub num_cont_vars: usize,
    pub prop_int_vars: f64,
    pub is_integer_lp: bool,
    pub num_nonzeros: usize,
    pub num_equalities: usize,
    pub min_abs_coefficient: Option<f64>,
    pub max_abs_coefficient: Option<f64>,
    pub objective_size: usize,
    pub num_int_in_objective: usize,
}

impl LpStatistics {
    /// Computes the statistics of `lp`
    pub fn compute(lp: &LinearProgram, cancel: &CancelToken) -> Result<Self, Cancelled> {
        let mut ticker = cancel.ticker();

        let num_vars = lp.number_of_variables();
        let num_int_vars = lp.variables().iter().filter(|v| v.is_integer()).count();

        let mut num_nonzeros = 0;
        let mut num_equalities = 0;
        let mut extrema: Option<(f64, f64)> = None;
        for row in lp.constraints() {
            if row.kind == RowKind::Constraint(Relation::Equal) {
                num_equalities += 1;
            }
            for &(_, coef) in &row.entries {
                ticker.tick()?;
                let abs = coef.abs();
                num_nonzeros += 1;
                extrema = Some(match extrema {
                    None => (abs, abs),
                    Some((lo, hi)) => (lo.min(abs), hi.max(abs)),
                });
            }
        }

        let (objective_size, num_int_in_objective) = lp
            .objective()
            .map(|obj| {
                (
                    obj.entries.len(),
                    obj.variables()
                        .filter(|&v| lp.variable(v).is_integer())
                        .count(),
                )
            })
            .unwrap_or((0, 0));

        Ok(Self {
            num_vars,
            num_cons: lp.number_of_constraints(),
            num_int_vars,
            num_cont_vars: num_vars - num_int_vars,
            prop_int_vars: if num_vars == 0 {
                0.0
            } else {
                num_int_vars as f64 / num_vars as f64
            },
            is_integer_lp: num_vars > 0 && num_int_vars == num_vars,
            num_nonzeros,
            num_equalities,
            min_abs_coefficient: extrema.map(|(lo, _)| lo),
            max_abs_coefficient: extrema.map(|(_, hi)| hi),
            objective_size,
            num_int_in_objective,
        })
    }
}
