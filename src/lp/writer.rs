use std::{
    fs::File,
    io::{BufWriter, Error, ErrorKind, Result, Write},
    path::Path,
};

use itertools::Itertools;

use super::*;

/// A configurable writer for the **MPS format**.
///
/// The objective is written first, followed by all constraints; columns are written in
/// variable order with `'MARKER'` lines around runs of integer variables. A variable without any
/// entry is declared through a zero coefficient in the objective, which readers do not store.
///
/// # Errors
/// Writing fails with [`ErrorKind::InvalidInput`] if the program has no objective, and with
/// [`ErrorKind::InvalidData`] if a name or number does not fit its fixed column, or if a name
/// contains whitespace in the free layout.
#[derive(Debug, Default, Clone)]
pub struct MpsWriter {
    format: MpsFormat,
}

impl MpsWriter {
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

    /// Writes `lp` to a file
    pub fn try_write_lp_file<P: AsRef<Path>>(&self, lp: &LinearProgram, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.try_write_lp(lp, &mut writer)?;
        writer.flush()
    }

    /// Writes `lp` to `writer`
    pub fn try_write_lp<W: Write>(&self, lp: &LinearProgram, mut writer: W) -> Result<()> {
        let objective = lp
            .objective()
            .ok_or_else(|| Error::new(ErrorKind::InvalidInput, "Program has no objective row"))?;

        match (self.format, lp.name()) {
            (MpsFormat::Fixed, Some(name)) => writeln!(writer, "NAME          {name}")?,
            (MpsFormat::Free, Some(name)) => writeln!(writer, "NAME {}", self.name(name)?)?,
            (_, None) => writeln!(writer, "NAME")?,
        }

        writeln!(writer, "ROWS")?;
        self.write_fields(&mut writer, ["N", objective.name.as_str()])?;
        for row in lp.constraints() {
            self.write_fields(&mut writer, [row.kind_code(), row.name.as_str()])?;
        }

        writeln!(writer, "COLUMNS")?;
        let mut columns = vec![Vec::new(); lp.number_of_variables()];
        for row in std::iter::once(objective).chain(lp.constraints()) {
            for &(var, coef) in &row.entries {
                columns[var].push((row.name.as_str(), coef));
            }
        }

        let mut in_block = false;
        let mut markers = 0;
        for (var, entries) in columns.iter_mut().enumerate() {
            let variable = lp.variable(var);
            if variable.is_integer() != in_block {
                in_block = variable.is_integer();
                self.write_marker(&mut writer, markers, in_block)?;
                markers += 1;
            }

            if entries.is_empty() {
                entries.push((objective.name.as_str(), 0.0));
            }
            for chunk in entries.chunks(2) {
                let mut fields = vec![String::new(), variable.name.clone()];
                for &(row, coef) in chunk {
                    fields.push(row.to_string());
                    fields.push(format_number(coef));
                }
                self.write_fields(&mut writer, fields)?;
            }
        }
        if in_block {
            self.write_marker(&mut writer, markers, false)?;
        }

        writeln!(writer, "RHS")?;
        let rhs = std::iter::once(objective)
            .chain(lp.constraints())
            .filter_map(|row| row.rhs.map(|value| (row.name.as_str(), value)))
            .collect_vec();
        for chunk in rhs.chunks(2) {
            let mut fields = vec![String::new(), "RHS".to_string()];
            for &(row, value) in chunk {
                fields.push(row.to_string());
                fields.push(format_number(value));
            }
            self.write_fields(&mut writer, fields)?;
        }

        writeln!(writer, "BOUNDS")?;
        for variable in lp.variables() {
            for (code, value) in bound_directives(variable) {
                let mut fields = vec![code.to_string(), "BND".to_string(), variable.name.clone()];
                fields.extend(value.map(format_number));
                self.write_fields(&mut writer, fields)?;
            }
        }

        writeln!(writer, "ENDATA")
    }

    fn write_marker<W: Write>(&self, writer: &mut W, id: usize, start: bool) -> Result<()> {
        let kind = if start { "'INTORG'" } else { "'INTEND'" };
        let name = format!("M{id}");
        self.write_fields(writer, ["", name.as_str(), "'MARKER'", "", kind])
    }

    fn name<'a>(&self, name: &'a str) -> Result<&'a str> {
        if self.format == MpsFormat::Free && name.contains(char::is_whitespace) {
            Err(Error::new(
                ErrorKind::InvalidData,
                format!("Name {name:?} contains whitespace"),
            ))
        } else {
            Ok(name)
        }
    }

    fn write_fields<W, I, S>(&self, writer: &mut W, fields: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = match self.format {
            MpsFormat::Fixed => fixed_line(fields)?,
            MpsFormat::Free => {
                let mut line = String::new();
                for field in fields {
                    let field = field.as_ref();
                    if !field.is_empty() {
                        line.push(' ');
                        line.push_str(self.name(field)?);
                    }
                }
                line
            }
        };
        writeln!(writer, "{line}")
    }
}

impl Row {
    fn kind_code(&self) -> &'static str {
        match self.kind {
            RowKind::Objective => "N",
            RowKind::Constraint(relation) => relation.code(),
        }
    }
}

/// Shortest representation that parses back to the same value
fn format_number(value: f64) -> String {
    format!("{value:?}")
}

fn bound_directives(variable: &Variable) -> Vec<(&'static str, Option<f64>)> {
    match (variable.lower, variable.upper) {
        (Some(lo), Some(up)) if lo == up => vec![("FX", Some(lo))],
        (lower, upper) => {
            let mut directives = Vec::with_capacity(2);
            match lower {
                Some(lo) if lo == variable.var_type.minimum() => directives.push(("MI", None)),
                Some(lo) => directives.push(("LO", Some(lo))),
                None => {}
            }
            if let Some(up) = upper {
                directives.push(("UP", Some(up)));
            }
            directives
        }
    }
}

fn fixed_line<I, S>(fields: I) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = String::with_capacity(61);
    for (idx, (field, &(start, end))) in fields.into_iter().zip(FIXED_FIELDS.iter()).enumerate() {
        let field = field.as_ref();
        if field.is_empty() {
            continue;
        }
        if field.len() > end - start {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("{field:?} does not fit into fixed column {}", start + 1),
            ));
        }

        line.extend(std::iter::repeat_n(' ', start - line.len()));
        // numbers are right-aligned
        if idx == 3 || idx == 5 {
            line.push_str(&format!("{field:>width$}", width = end - start));
        } else {
            line.push_str(field);
        }
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::{Rng, SeedableRng, seq::SliceRandom};
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::{cancel::CancelToken, gens::tests::random_lp};

    fn sample() -> LinearProgram {
        let mut lp = LinearProgram::new();
        lp.set_name("sample");
        let obj = lp.add_row("cost", RowKind::Objective);
        let c1 = lp.add_row("c1", RowKind::Constraint(Relation::LessEq));
        let c2 = lp.add_row("c2", RowKind::Constraint(Relation::Equal));
        let c3 = lp.add_row("c3", RowKind::Constraint(Relation::GreaterEq));

        let x = lp.add_variable("x", VarType::Continuous);
        let y = lp.add_variable("y", VarType::Integer);
        let z = lp.add_variable("z", VarType::Integer);
        let u = lp.add_variable("u", VarType::Continuous);
        lp.add_variable("w", VarType::Integer);

        // column-major insertion as a reader would produce it
        for (row, var, coef) in [
            (obj, x, 1.5),
            (c1, x, -2.0),
            (c3, x, 1e-7),
            (c1, y, 3.0),
            (c2, y, 0.25),
            (obj, z, -1.0),
            (c2, z, 12.0),
            (c3, u, 4.0),
        ] {
            lp.add_entry(row, var, coef);
        }

        lp.set_rhs(c1, 10.0);
        lp.set_rhs(c3, -3.5);

        lp.variable_mut(x).upper = Some(8.0);
        lp.variable_mut(y).lower = Some(0.0);
        lp.variable_mut(y).upper = Some(1.0);
        lp.variable_mut(z).lower = Some(VarType::Integer.minimum());
        lp.variable_mut(u).lower = Some(2.0);
        lp.variable_mut(u).upper = Some(2.0);
        lp
    }

    fn roundtrip(format: MpsFormat) {
        let lp = sample();
        let mut buffer = Vec::new();
        MpsWriter::new()
            .format(format)
            .try_write_lp(&lp, &mut buffer)
            .unwrap();

        let read = MpsReader::new()
            .format(format)
            .try_read_lp(Cursor::new(buffer), &CancelToken::new())
            .unwrap();

        assert_eq!(read.without_statistics(), lp);
    }

    #[test]
    fn roundtrip_fixed() {
        roundtrip(MpsFormat::Fixed);
    }

    #[test]
    fn roundtrip_free() {
        roundtrip(MpsFormat::Free);
    }

    /// Rebuilds `lp` in a random declaration order: the objective somewhere among the
    /// constraints, entries row by row, plus random bounds and right-hand sides.
    fn redeclared<R: Rng>(rng: &mut R, lp: &LinearProgram) -> LinearProgram {
        let mut result = LinearProgram::new();
        result.set_name("random");

        let mut vars = (0..lp.number_of_variables()).collect_vec();
        vars.shuffle(rng);
        let mut ids = vec![0; vars.len()];
        for &var in &vars {
            let source = lp.variable(var);
            let id = result.add_variable(source.name.as_str(), source.var_type);
            ids[var] = id;

            let lower = match rng.random_range(0..4) {
                0 => None,
                1 => Some(source.var_type.minimum()),
                _ => Some(rng.random_range(-5..=5) as f64),
            };
            let upper = match rng.random_range(0..4) {
                0 => None,
                1 => lower.filter(|lo| lo.abs() < 100.0),
                _ => Some(rng.random_range(5..=20) as f64 + 0.5),
            };
            let variable = result.variable_mut(id);
            variable.lower = lower;
            variable.upper = upper;
        }

        let mut rows = (0..lp.rows().len()).collect_vec();
        rows.shuffle(rng);
        if lp.row(rows[0]).is_objective() {
            let last = rows.len() - 1;
            rows.swap(0, last);
        }
        for &row in &rows {
            let source = lp.row(row);
            let id = result.add_row(source.name.as_str(), source.kind);
            let mut entries = source.entries.clone();
            entries.shuffle(rng);
            for (var, coef) in entries {
                result.add_entry(id, ids[var], coef * rng.random_range(-3..=3) as f64);
            }
            if !source.is_objective() && rng.random_bool(0.5) {
                result.set_rhs(id, rng.random_range(-10..=10) as f64 / 4.0);
            }
        }
        result
    }

    type NamedVariable = (String, VarType, Option<f64>, Option<f64>);
    type NamedRow = (String, RowKind, Option<f64>, Vec<(String, f64)>);

    /// Variables and rows sorted by name, each row's entries sorted by variable name
    fn by_name(lp: &LinearProgram) -> (Vec<NamedVariable>, Vec<NamedRow>) {
        let variables = lp
            .variables()
            .iter()
            .map(|v| (v.name.clone(), v.var_type, v.lower, v.upper))
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .collect_vec();
        let rows = lp
            .rows()
            .iter()
            .map(|row| {
                let entries = row
                    .entries
                    .iter()
                    .map(|&(var, coef)| (lp.variable(var).name.clone(), coef))
                    .sorted_by(|a, b| a.0.cmp(&b.0))
                    .collect_vec();
                (row.name.clone(), row.kind, row.rhs, entries)
            })
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .collect_vec();
        (variables, rows)
    }

    #[test]
    fn roundtrip_of_randomly_declared_programs() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x3b5);
        for _ in 0..20 {
            let source = random_lp(rng, 12, 6, 0.3);
            let lp = redeclared(rng, &source);
            assert_ne!(lp.rows()[0].kind, RowKind::Objective);

            for format in [MpsFormat::Fixed, MpsFormat::Free] {
                let mut buffer = Vec::new();
                MpsWriter::new()
                    .format(format)
                    .try_write_lp(&lp, &mut buffer)
                    .unwrap();
                let read = MpsReader::new()
                    .format(format)
                    .try_read_lp(Cursor::new(buffer), &CancelToken::new())
                    .unwrap();

                assert_eq!(read.name(), Some("random"));
                assert_eq!(by_name(&read), by_name(&lp));
            }
        }
    }

    #[test]
    fn fixed_layout_positions() {
        let line = fixed_line(["", "x", "c1", "1.5", "c2", "-2.0"]).unwrap();
        assert_eq!(&line[4..5], "x");
        assert_eq!(&line[14..16], "c1");
        assert_eq!(line[24..36].trim(), "1.5");
        assert_eq!(&line[39..41], "c2");
        assert_eq!(line.len(), 61);
    }

    #[test]
    fn fixed_layout_rejects_long_names() {
        let mut lp = sample();
        lp.add_variable("a_very_long_name", VarType::Continuous);
        let result = MpsWriter::new().try_write_lp(&lp, Vec::new());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn requires_objective() {
        let mut lp = LinearProgram::new();
        lp.add_row("c1", RowKind::Constraint(Relation::LessEq));
        let result = MpsWriter::new().try_write_lp(&lp, Vec::new());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput);
    }
}
