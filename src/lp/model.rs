use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Index of a [`Variable`] in the arena of a [`LinearProgram`]
pub type VarId = usize;

/// Index of a [`Row`] in the arena of a [`LinearProgram`]
pub type RowId = usize;

/// Integrality of a variable
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarType {
    Integer,
    Continuous,
}

impl VarType {
    /// Value assigned to the lower bound by an `MI` directive
    pub fn minimum(&self) -> f64 {
        match self {
            VarType::Integer => i64::MIN as f64,
            VarType::Continuous => f64::NEG_INFINITY,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, VarType::Integer)
    }
}

/// A decision variable. Unset bounds (`None`) mean unbounded in that direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub var_type: VarType,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Variable {
    pub fn new<S: Into<String>>(name: S, var_type: VarType) -> Self {
        Self {
            name: name.into(),
            var_type,
            lower: None,
            upper: None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.var_type.is_integer()
    }
}

/// Relational operator of a constraint row.
/// `Free` is used for additional `N` rows which do not constrain anything.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
    Free,
}

impl Relation {
    /// MPS row-type code
    pub fn code(&self) -> &'static str {
        match self {
            Relation::LessEq => "L",
            Relation::GreaterEq => "G",
            Relation::Equal => "E",
            Relation::Free => "N",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKind {
    Objective,
    Constraint(Relation),
}

/// A named row of the constraint matrix. Entries are sparse: zero coefficients are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub name: String,
    pub kind: RowKind,
    pub entries: Vec<(VarId, f64)>,
    pub rhs: Option<f64>,
}

impl Row {
    pub fn new<S: Into<String>>(name: S, kind: RowKind) -> Self {
        Self {
            name: name.into(),
            kind,
            entries: Vec::new(),
            rhs: None,
        }
    }

    pub fn is_objective(&self) -> bool {
        matches!(self.kind, RowKind::Objective)
    }

    /// Returns an iterator over the ids of all variables with an entry in this row
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.entries.iter().map(|&(v, _)| v)
    }
}

/// In-memory linear program.
///
/// Owns its variables and rows in two arenas; rows reference variables by [`VarId`], so
/// replacing the record behind an id swaps the variable in every row referencing it.
///
/// Invariants:
/// - variable names are unique, row names are unique (objective included)
/// - every [`VarId`] stored in a row entry indexes an existing variable
/// - at most one row has kind [`RowKind::Objective`]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearProgram {
    name: Option<String>,
    variables: Vec<Variable>,
    var_index: FxHashMap<String, VarId>,
    rows: Vec<Row>,
    row_index: FxHashMap<String, RowId>,
    objective: Option<RowId>,
    statistics: Option<super::LpStatistics>,
}

impl LinearProgram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = Some(name.into());
    }

    /// Adds a variable without bounds and returns its id.
    /// Returns `Err(existing)` if a variable with that name is present.
    pub fn try_add_variable<S: Into<String>>(
        &mut self,
        name: S,
        var_type: VarType,
    ) -> Result<VarId, VarId> {
        let name = name.into();
        if let Some(&existing) = self.var_index.get(&name) {
            return Err(existing);
        }
        let id = self.variables.len();
        self.var_index.insert(name.clone(), id);
        self.variables.push(Variable::new(name, var_type));
        Ok(id)
    }

    /// Adds a variable and returns its id.
    /// ** Panics if a variable with that name is present **
    pub fn add_variable<S: Into<String>>(&mut self, name: S, var_type: VarType) -> VarId {
        match self.try_add_variable(name, var_type) {
            Ok(id) => id,
            Err(id) => panic!("Duplicate variable {:?}", self.variables[id].name),
        }
    }

    /// Adds a row and returns its id.
    /// Returns `Err(existing)` if a row with that name is present.
    /// ** Panics if `kind` is `Objective` and an objective is already set **
    pub fn try_add_row<S: Into<String>>(&mut self, name: S, kind: RowKind) -> Result<RowId, RowId> {
        let name = name.into();
        if let Some(&existing) = self.row_index.get(&name) {
            return Err(existing);
        }

        let id = self.rows.len();
        if kind == RowKind::Objective {
            assert!(self.objective.is_none(), "Objective is already set");
            self.objective = Some(id);
        }
        self.row_index.insert(name.clone(), id);
        self.rows.push(Row::new(name, kind));
        Ok(id)
    }

    /// Adds a row and returns its id.
    /// ** Panics if a row with that name is present **
    pub fn add_row<S: Into<String>>(&mut self, name: S, kind: RowKind) -> RowId {
        match self.try_add_row(name, kind) {
            Ok(id) => id,
            Err(id) => panic!("Duplicate row {:?}", self.rows[id].name),
        }
    }

    /// Appends the entry `(var, coefficient)` to `row`. Zero coefficients are not stored.
    /// Returns *true* if the entry was stored.
    pub fn add_entry(&mut self, row: RowId, var: VarId, coefficient: f64) -> bool {
        assert!(var < self.variables.len());
        if coefficient == 0.0 {
            return false;
        }
        self.rows[row].entries.push((var, coefficient));
        true
    }

    pub fn set_rhs(&mut self, row: RowId, value: f64) {
        self.rows[row].rhs = Some(value);
    }

    /// Replaces `var` by an integer variable of the same name and bounds.
    /// Every row referencing `var` now references the new record.
    pub fn convert_to_integer(&mut self, var: VarId) {
        let old = &self.variables[var];
        let replacement = Variable {
            name: old.name.clone(),
            var_type: VarType::Integer,
            lower: old.lower,
            upper: old.upper,
        };
        self.variables[var] = replacement;
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, var: VarId) -> &Variable {
        &self.variables[var]
    }

    pub fn variable_mut(&mut self, var: VarId) -> &mut Variable {
        &mut self.variables[var]
    }

    pub fn variable_id(&self, name: &str) -> Option<VarId> {
        self.var_index.get(name).copied()
    }

    /// Returns every row, objective included, in declaration order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row: RowId) -> &Row {
        &self.rows[row]
    }

    pub fn row_id(&self, name: &str) -> Option<RowId> {
        self.row_index.get(name).copied()
    }

    /// Looks up a row (objective included) by name
    pub fn row_by_name(&self, name: &str) -> Option<&Row> {
        self.row_id(name).map(|id| &self.rows[id])
    }

    pub fn objective(&self) -> Option<&Row> {
        self.objective.map(|id| &self.rows[id])
    }

    pub fn objective_id(&self) -> Option<RowId> {
        self.objective
    }

    /// Returns an iterator over all constraint rows in declaration order
    pub fn constraints(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter().filter(|row| !row.is_objective())
    }

    pub fn number_of_constraints(&self) -> usize {
        self.rows.len() - self.objective.is_some() as usize
    }

    pub fn statistics(&self) -> Option<&super::LpStatistics> {
        self.statistics.as_ref()
    }

    pub fn attach_statistics(&mut self, statistics: super::LpStatistics) {
        self.statistics = Some(statistics);
    }

    /// Drops attached statistics. Used to compare models independent of how they were built.
    pub fn without_statistics(mut self) -> Self {
        self.statistics = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversion_swaps_every_reference() {
        let mut lp = LinearProgram::new();
        let obj = lp.add_row("obj", RowKind::Objective);
        let c1 = lp.add_row("c1", RowKind::Constraint(Relation::LessEq));
        let x = lp.add_variable("x", VarType::Continuous);
        let y = lp.add_variable("y", VarType::Continuous);
        lp.add_entry(obj, x, 1.0);
        lp.add_entry(c1, x, 2.0);
        lp.add_entry(c1, y, -1.0);
        lp.variable_mut(x).upper = Some(4.0);

        lp.convert_to_integer(x);

        assert!(lp.variable(x).is_integer());
        assert_eq!(lp.variable(x).name, "x");
        assert_eq!(lp.variable(x).upper, Some(4.0));
        assert!(!lp.variable(y).is_integer());
        for row in lp.rows() {
            for v in row.variables() {
                if v == x {
                    assert!(lp.variable(v).is_integer());
                }
            }
        }
        assert_eq!(lp.variable_id("x"), Some(x));
    }

    #[test]
    fn zero_coefficients_are_not_stored() {
        let mut lp = LinearProgram::new();
        let c1 = lp.add_row("c1", RowKind::Constraint(Relation::Equal));
        let x = lp.add_variable("x", VarType::Integer);
        assert!(!lp.add_entry(c1, x, 0.0));
        assert!(lp.row(c1).entries.is_empty());
        assert_eq!(lp.number_of_variables(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut lp = LinearProgram::new();
        let obj = lp.add_row("obj", RowKind::Objective);
        assert_eq!(
            lp.try_add_row("obj", RowKind::Constraint(Relation::Free)),
            Err(obj)
        );
        let x = lp.add_variable("x", VarType::Integer);
        assert_eq!(lp.try_add_variable("x", VarType::Continuous), Err(x));
        assert_eq!(lp.number_of_constraints(), 0);
        assert_eq!(lp.objective_id(), Some(obj));
    }
}
