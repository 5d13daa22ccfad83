/*!
# Result Records

One flat [`InstanceRecord`] per instance: LP statistics, then graph statistics and width bounds
per representation, then the elapsed wall-clock time. Values that were not computed are emitted
as empty fields, never as sentinel numbers.
*/

use std::{
    fmt::Display,
    io::{self, Write},
    path::PathBuf,
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::{
    gens::GraphRepresentation, lp::LpStatistics, pipeline::InstanceAnalysis, runner::TaskState,
    stats::GraphStatistics,
};

const LP_COLUMNS: [&str; 12] = [
    "num_vars",
    "num_cons",
    "num_int_vars",
    "num_cont_vars",
    "prop_int_vars",
    "is_integer_lp",
    "num_nonzeros",
    "num_equalities",
    "min_abs_coefficient",
    "max_abs_coefficient",
    "objective_size",
    "num_int_in_objective",
];

const GRAPH_COLUMNS: [&str; 15] = [
    "num_nodes",
    "num_int_nodes",
    "prop_int_nodes",
    "num_edges",
    "density",
    "min_degree",
    "max_degree",
    "avg_degree",
    "num_components",
    "treewidth_lb",
    "treewidth_ub",
    "torso_width_lb",
    "torso_width_ub",
    "tree_depth_lb",
    "tree_depth_ub",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub path: PathBuf,
    pub state: TaskState,
    pub name: Option<String>,
    pub lp: Option<LpStatistics>,
    pub graphs: Vec<GraphStatistics>,
    pub elapsed: Duration,
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl InstanceRecord {
    /// Creates a record without any results
    pub fn empty(path: PathBuf, state: TaskState, elapsed: Duration) -> Self {
        Self {
            path,
            state,
            name: None,
            lp: None,
            graphs: Vec::new(),
            elapsed,
        }
    }

    /// Creates the record of a completed analysis
    pub fn completed(path: PathBuf, analysis: InstanceAnalysis, elapsed: Duration) -> Self {
        Self {
            path,
            state: TaskState::Completed,
            name: analysis.name,
            lp: Some(analysis.lp),
            graphs: analysis.graphs,
            elapsed,
        }
    }

    pub fn graph(&self, representation: GraphRepresentation) -> Option<&GraphStatistics> {
        self.graphs
            .iter()
            .find(|stats| stats.representation == representation)
    }

    /// Column names matching [`InstanceRecord::fields`] for the given representations
    pub fn header(representations: &[GraphRepresentation]) -> Vec<String> {
        let mut header = vec!["instance".to_string(), "state".to_string(), "name".to_string()];
        header.extend(LP_COLUMNS.iter().map(|c| c.to_string()));
        for representation in representations {
            header.extend(GRAPH_COLUMNS.iter().map(|c| format!("{representation}_{c}")));
        }
        header.push("elapsed_secs".to_string());
        header
    }

    /// Flattens the record; representations without statistics yield empty fields
    pub fn fields(&self, representations: &[GraphRepresentation]) -> Vec<String> {
        let mut fields = vec![
            self.path.display().to_string(),
            self.state.to_string(),
            opt(self.name.as_deref()),
        ];

        match &self.lp {
            Some(lp) => fields.extend([
                lp.num_vars.to_string(),
                lp.num_cons.to_string(),
                lp.num_int_vars.to_string(),
                lp.num_cont_vars.to_string(),
                lp.prop_int_vars.to_string(),
                lp.is_integer_lp.to_string(),
                lp.num_nonzeros.to_string(),
                lp.num_equalities.to_string(),
                opt(lp.min_abs_coefficient),
                opt(lp.max_abs_coefficient),
                lp.objective_size.to_string(),
                lp.num_int_in_objective.to_string(),
            ]),
            None => fields.extend(LP_COLUMNS.iter().map(|_| String::new())),
        }

        for &representation in representations {
            match self.graph(representation) {
                Some(g) => fields.extend([
                    g.num_nodes.to_string(),
                    g.num_int_nodes.to_string(),
                    g.prop_int_nodes.to_string(),
                    g.num_edges.to_string(),
                    g.density.to_string(),
                    g.min_degree.to_string(),
                    g.max_degree.to_string(),
                    g.avg_degree.to_string(),
                    g.num_components.to_string(),
                    opt(g.treewidth_lb),
                    opt(g.treewidth_ub),
                    opt(g.torso_width_lb),
                    opt(g.torso_width_ub),
                    opt(g.tree_depth_lb),
                    opt(g.tree_depth_ub),
                ]),
                None => fields.extend(GRAPH_COLUMNS.iter().map(|_| String::new())),
            }
        }

        fields.push(format!("{:.3}", self.elapsed.as_secs_f64()));
        fields
    }
}

/// Quotes a field if it contains a separator, a quote or a line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row<W: Write>(writer: &mut W, fields: &[String]) -> io::Result<()> {
    let line = fields.iter().map(|f| escape(f)).collect::<Vec<_>>().join(",");
    writeln!(writer, "{line}")
}

/// Writes a header line followed by one line per record as comma separated values
pub fn write_csv<'a, W, I>(
    writer: &mut W,
    records: I,
    representations: &[GraphRepresentation],
) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a InstanceRecord>,
{
    write_row(writer, &InstanceRecord::header(representations))?;
    for record in records {
        write_row(writer, &record.fields(representations))?;
    }
    Ok(())
}
