use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::{debug, warn};

use super::*;
use crate::{
    cancel::CancelToken,
    error::{MpsError, MpsResult},
};

/// Sections of an MPS file in the order they must appear
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    Preamble,
    Name,
    Rows,
    Columns,
    Rhs,
    Ranges,
    Bounds,
    Endata,
}

impl FromStr for Section {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NAME" => Ok(Section::Name),
            "ROWS" => Ok(Section::Rows),
            "COLUMNS" => Ok(Section::Columns),
            "RHS" => Ok(Section::Rhs),
            "RANGES" => Ok(Section::Ranges),
            "BOUNDS" => Ok(Section::Bounds),
            "ENDATA" => Ok(Section::Endata),
            _ => Err(()),
        }
    }
}

/// Data line split into the six canonical fields
/// `code, name/set, row/column, value, row2, value2`.
type Fields<'a> = [Option<&'a str>; 6];

/// A configurable reader for the **MPS format**.
///
/// Undeclared row or column references are logged and skipped; everything else that does not
/// match the grammar is reported as [`MpsError::Format`].
#[derive(Debug, Default, Clone)]
pub struct MpsReader {
    format: MpsFormat,
}

impl MpsReader {
    /// Creates a reader for the fixed layout
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_format(&mut self, format: MpsFormat) {
        self.format = format;
    }

    /// Updates the layout, consuming and returning `self` for chaining.
    pub fn format(mut self, format: MpsFormat) -> Self {
        self.set_format(format);
        self
    }

    /// Reads a [`LinearProgram`] from a file and attaches its [`LpStatistics`].
    pub fn try_read_lp_file<P: AsRef<Path>>(
        &self,
        path: P,
        cancel: &CancelToken,
    ) -> MpsResult<LinearProgram> {
        self.try_read_lp(BufReader::new(File::open(path)?), cancel)
    }

    /// Reads a [`LinearProgram`] from `reader` and attaches its [`LpStatistics`].
    ///
    /// # Errors
    /// - [`MpsError::Io`] if reading fails
    /// - [`MpsError::Format`] on malformed section order, unknown row/bound codes, duplicate rows,
    ///   unparsable numbers, or a file without an objective row
    /// - [`MpsError::Cancelled`] if `cancel` was set while reading
    pub fn try_read_lp<R: BufRead>(
        &self,
        reader: R,
        cancel: &CancelToken,
    ) -> MpsResult<LinearProgram> {
        let mut state = ParserState::default();
        let mut ticker = cancel.ticker();
        let mut last_line = 0;

        for (idx, line) in reader.lines().enumerate() {
            ticker.tick()?;
            let line = line?;
            let lineno = idx + 1;
            last_line = lineno;

            if line.trim().is_empty() || line.starts_with('*') {
                continue;
            }

            if !line.starts_with(char::is_whitespace) {
                state.enter_section(&line, lineno)?;
                if state.section == Section::Endata {
                    break;
                }
                continue;
            }

            match state.section {
                Section::Preamble | Section::Name => {
                    return Err(MpsError::format(lineno, "Data line outside of any section"));
                }
                Section::Rows => {
                    let fields = self.split(&line, Section::Rows, lineno)?;
                    state.parse_row(&fields, lineno)?;
                }
                Section::Columns => {
                    if line.contains("'MARKER'") {
                        state.parse_marker(&line, lineno);
                    } else {
                        let fields = self.split(&line, Section::Columns, lineno)?;
                        state.parse_column(&fields, lineno)?;
                    }
                }
                Section::Rhs => {
                    let fields = self.split(&line, Section::Rhs, lineno)?;
                    state.parse_rhs(&fields, lineno)?;
                }
                Section::Ranges => {}
                Section::Bounds => {
                    let fields = self.split(&line, Section::Bounds, lineno)?;
                    state.parse_bound(&fields, lineno)?;
                }
                Section::Endata => unreachable!(),
            }
        }

        if state.lp.objective_id().is_none() {
            return Err(MpsError::format(last_line, "No objective (N) row declared"));
        }
        if state.section != Section::Endata {
            warn!("MPS input ends without ENDATA");
        }

        let mut lp = state.lp;
        let statistics = LpStatistics::compute(&lp, cancel)?;
        debug!(
            vars = statistics.num_vars,
            cons = statistics.num_cons,
            int_vars = statistics.num_int_vars,
            "Parsed linear program"
        );
        lp.attach_statistics(statistics);
        Ok(lp)
    }

    fn split<'a>(&self, line: &'a str, section: Section, lineno: usize) -> MpsResult<Fields<'a>> {
        match self.format {
            MpsFormat::Fixed => split_fixed(line, lineno),
            MpsFormat::Free => split_free(line, section, lineno),
        }
    }
}

fn split_fixed(line: &str, lineno: usize) -> MpsResult<Fields<'_>> {
    let mut fields = [None; 6];
    for (field, &(start, end)) in fields.iter_mut().zip(FIXED_FIELDS.iter()) {
        if start >= line.len() {
            break;
        }
        let text = line
            .get(start..end.min(line.len()))
            .ok_or_else(|| MpsError::format(lineno, "Field boundary splits a character"))?
            .trim();
        if !text.is_empty() {
            *field = Some(text);
        }
    }
    Ok(fields)
}

fn split_free(line: &str, section: Section, lineno: usize) -> MpsResult<Fields<'_>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() > 6 {
        return Err(MpsError::format(lineno, "Too many fields"));
    }

    let mut fields = [None; 6];
    match section {
        Section::Columns => place(&mut fields, 1, &tokens, lineno)?,
        Section::Rhs => {
            // the set name is optional
            let offset = if tokens.len() % 2 == 1 { 1 } else { 2 };
            place(&mut fields, offset, &tokens, lineno)?;
        }
        Section::Bounds => {
            let Some((&code, rest)) = tokens.split_first() else {
                return Err(MpsError::format(lineno, "Empty bound line"));
            };
            fields[0] = Some(code);
            let has_set = match rest.len() {
                3 => true,
                2 => !bound_takes_value(code),
                0 | 1 => false,
                _ => return Err(MpsError::format(lineno, "Too many fields")),
            };
            place(&mut fields, if has_set { 1 } else { 2 }, rest, lineno)?;
        }
        _ => place(&mut fields, 0, &tokens, lineno)?,
    }
    Ok(fields)
}

/// Stores `tokens` from field `offset` onwards; a token without a field is an error
fn place<'a>(
    fields: &mut Fields<'a>,
    offset: usize,
    tokens: &[&'a str],
    lineno: usize,
) -> MpsResult<()> {
    if offset + tokens.len() > fields.len() {
        return Err(MpsError::format(lineno, "Too many fields"));
    }
    for (field, &token) in fields[offset..].iter_mut().zip(tokens) {
        *field = Some(token);
    }
    Ok(())
}

fn parse_value(token: Option<&str>, lineno: usize) -> MpsResult<f64> {
    let token = token.ok_or_else(|| MpsError::format(lineno, "Missing numeric value"))?;
    token
        .parse()
        .map_err(|_| MpsError::format(lineno, format!("Cannot parse number {token:?}")))
}

fn required<'a>(field: Option<&'a str>, what: &str, lineno: usize) -> MpsResult<&'a str> {
    field.ok_or_else(|| MpsError::format(lineno, format!("Missing {what}")))
}

#[derive(Debug)]
struct ParserState {
    lp: LinearProgram,
    section: Section,
    integer_block: bool,
}

impl Default for ParserState {
    fn default() -> Self {
        Self {
            lp: LinearProgram::new(),
            section: Section::Preamble,
            integer_block: false,
        }
    }
}

impl ParserState {
    fn enter_section(&mut self, line: &str, lineno: usize) -> MpsResult<()> {
        let keyword = line.split_whitespace().next().unwrap_or_default();
        let next: Section = keyword
            .parse()
            .map_err(|_| MpsError::format(lineno, format!("Unknown section {keyword:?}")))?;

        if next <= self.section {
            return Err(MpsError::format(
                lineno,
                format!("Section {keyword} out of order"),
            ));
        }

        if next == Section::Name {
            let name = line[4..].trim();
            if !name.is_empty() {
                self.lp.set_name(name);
            }
        }
        if next > Section::Columns && self.integer_block {
            warn!(line = lineno, "Integer marker block is not closed");
            self.integer_block = false;
        }

        self.section = next;
        Ok(())
    }

    fn parse_row(&mut self, fields: &Fields<'_>, lineno: usize) -> MpsResult<()> {
        let code = required(fields[0], "row type", lineno)?;
        let name = required(fields[1], "row name", lineno)?;

        let kind = match code {
            "N" if self.lp.objective_id().is_none() => RowKind::Objective,
            "N" => {
                warn!(
                    line = lineno,
                    row = name,
                    "Additional objective row is treated as a free constraint"
                );
                RowKind::Constraint(Relation::Free)
            }
            "L" => RowKind::Constraint(Relation::LessEq),
            "G" => RowKind::Constraint(Relation::GreaterEq),
            "E" => RowKind::Constraint(Relation::Equal),
            _ => {
                return Err(MpsError::format(
                    lineno,
                    format!("Unknown row type {code:?}"),
                ));
            }
        };

        self.lp
            .try_add_row(name, kind)
            .map_err(|_| MpsError::format(lineno, format!("Duplicate row {name:?}")))?;
        Ok(())
    }

    fn parse_marker(&mut self, line: &str, lineno: usize) {
        if line.contains("'INTORG'") {
            if self.integer_block {
                warn!(line = lineno, "Nested integer marker block");
            }
            self.integer_block = true;
        } else if line.contains("'INTEND'") {
            if !self.integer_block {
                warn!(line = lineno, "Integer marker block ends without start");
            }
            self.integer_block = false;
        } else {
            warn!(line = lineno, "Unknown marker skipped");
        }
    }

    fn parse_column(&mut self, fields: &Fields<'_>, lineno: usize) -> MpsResult<()> {
        let name = required(fields[1], "column name", lineno)?;
        let var_type = if self.integer_block {
            VarType::Integer
        } else {
            VarType::Continuous
        };
        let var = self
            .lp
            .try_add_variable(name, var_type)
            .unwrap_or_else(|existing| existing);

        for (row_field, value_field) in [(fields[2], fields[3]), (fields[4], fields[5])] {
            let Some(row_name) = row_field else {
                if value_field.is_some() {
                    return Err(MpsError::format(lineno, "Value without row"));
                }
                continue;
            };

            let value = parse_value(value_field, lineno)?;
            match self.lp.row_id(row_name) {
                Some(row) => {
                    self.lp.add_entry(row, var, value);
                }
                None => warn!(
                    line = lineno,
                    row = row_name,
                    column = name,
                    "Entry references undeclared row and is skipped"
                ),
            }
        }
        Ok(())
    }

    fn parse_rhs(&mut self, fields: &Fields<'_>, lineno: usize) -> MpsResult<()> {
        for (row_field, value_field) in [(fields[2], fields[3]), (fields[4], fields[5])] {
            let Some(row_name) = row_field else {
                continue;
            };
            let value = parse_value(value_field, lineno)?;
            match self.lp.row_id(row_name) {
                Some(row) => self.lp.set_rhs(row, value),
                None => warn!(
                    line = lineno,
                    row = row_name,
                    "Right-hand side references undeclared row and is skipped"
                ),
            }
        }
        Ok(())
    }

    fn parse_bound(&mut self, fields: &Fields<'_>, lineno: usize) -> MpsResult<()> {
        let code = required(fields[0], "bound type", lineno)?;
        let column = required(fields[2], "column name", lineno)?;

        let value = if bound_takes_value(code) && code != "SC" {
            Some(parse_value(fields[3], lineno)?)
        } else {
            None
        };

        let Some(var) = self.lp.variable_id(column) else {
            if !matches!(
                code,
                "UP" | "LO" | "FX" | "FR" | "MI" | "PL" | "BV" | "LI" | "UI" | "SC"
            ) {
                return Err(MpsError::format(
                    lineno,
                    format!("Unknown bound type {code:?}"),
                ));
            }
            warn!(
                line = lineno,
                column, "Bound references undeclared column and is skipped"
            );
            return Ok(());
        };

        match code {
            "UP" => self.lp.variable_mut(var).upper = value,
            "LO" => self.lp.variable_mut(var).lower = value,
            "FX" => {
                let variable = self.lp.variable_mut(var);
                variable.lower = value;
                variable.upper = value;
            }
            "FR" => {
                let variable = self.lp.variable_mut(var);
                variable.lower = None;
                variable.upper = None;
            }
            "MI" => {
                let variable = self.lp.variable_mut(var);
                variable.lower = Some(variable.var_type.minimum());
            }
            "PL" => self.lp.variable_mut(var).upper = None,
            "BV" => {
                if !self.lp.variable(var).is_integer() {
                    debug!(column, "Binary bound converts variable to integer");
                    self.lp.convert_to_integer(var);
                }
                let variable = self.lp.variable_mut(var);
                variable.lower = Some(0.0);
                variable.upper = Some(1.0);
            }
            "LI" | "UI" => {
                if !self.lp.variable(var).is_integer() {
                    warn!(
                        line = lineno,
                        column, "Integer bound on a continuous variable"
                    );
                }
                let variable = self.lp.variable_mut(var);
                if code == "LI" {
                    variable.lower = value;
                } else {
                    variable.upper = value;
                }
            }
            "SC" => warn!(
                line = lineno,
                column, "Semi-continuous bounds are not supported and skipped"
            ),
            _ => {
                return Err(MpsError::format(
                    lineno,
                    format!("Unknown bound type {code:?}"),
                ));
            }
        }
        Ok(())
    }
}
