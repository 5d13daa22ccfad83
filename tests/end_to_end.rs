use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use mipgraphs::{
    config::AnalysisConfig,
    gens::GraphRepresentation,
    lp::{LinearProgram, MpsFormat, MpsReader, MpsWriter},
    prelude::*,
    report::InstanceRecord,
    runner::{TaskRunner, TaskState},
    stats::GraphStatistics,
};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/example.mps")
}

fn read_fixture() -> LinearProgram {
    MpsReader::new()
        .try_read_lp_file(fixture(), &CancelToken::new())
        .unwrap()
}

fn graph_statistics(lp: &LinearProgram, representation: GraphRepresentation) -> GraphStatistics {
    let token = CancelToken::new();
    let graph = representation.generate(lp, false, &token).unwrap();
    GraphStatistics::compute(
        &graph,
        representation,
        representation.density_kind(lp, false),
        &token,
    )
    .unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-4, "{actual} != {expected}");
}

#[test]
fn lp_statistics() {
    let lp = read_fixture();
    assert_eq!(lp.name(), Some("EXAMPLE"));

    let stats = lp.statistics().unwrap();
    assert_eq!(stats.num_vars, 7);
    assert_eq!(stats.num_cons, 8);
    assert_eq!(stats.num_int_vars, 2);
    assert_eq!(stats.num_cont_vars, 5);
    assert_close(stats.prop_int_vars, 0.2857);
    assert!(!stats.is_integer_lp);
    assert_eq!(stats.num_nonzeros, 23);
    assert_eq!(stats.num_equalities, 2);
    assert_eq!(stats.min_abs_coefficient, Some(0.25));
    assert_eq!(stats.max_abs_coefficient, Some(7.0));
    assert_eq!(stats.objective_size, 3);
    assert_eq!(stats.num_int_in_objective, 1);

    let x5 = lp.variable(lp.variable_id("X5").unwrap());
    assert_eq!(x5.lower, Some(f64::NEG_INFINITY));
    assert_eq!(lp.variable(lp.variable_id("X6").unwrap()).upper, Some(4.5));
}

#[test]
fn primal_graph() {
    let stats = graph_statistics(&read_fixture(), GraphRepresentation::Primal);
    assert_eq!(stats.num_nodes, 7);
    assert_eq!(stats.num_int_nodes, 2);
    assert_eq!(stats.num_edges, 12);
    assert_close(stats.density, 0.5714);
    assert_eq!((stats.min_degree, stats.max_degree), (1, 5));
    assert_eq!(stats.num_components, 1);
}

#[test]
fn incidence_graph() {
    let stats = graph_statistics(&read_fixture(), GraphRepresentation::Incidence);
    assert_eq!(stats.num_nodes, 15);
    assert_eq!(stats.num_edges, 23);
    assert_eq!(stats.num_int_nodes, 10);
    assert_close(stats.density, 23.0 / 56.0);
}

#[test]
fn dual_graph() {
    let stats = graph_statistics(&read_fixture(), GraphRepresentation::Dual);
    assert_eq!(stats.num_nodes, 8);
    assert_eq!(stats.num_edges, 22);
    assert_close(stats.density, 0.7857);
}

#[test]
fn writer_roundtrip_preserves_fixture() {
    let lp = read_fixture();
    for format in [MpsFormat::Fixed, MpsFormat::Free] {
        let mut buffer = Vec::new();
        MpsWriter::new()
            .format(format)
            .try_write_lp(&lp, &mut buffer)
            .unwrap();
        let reread = MpsReader::new()
            .format(format)
            .try_read_lp(Cursor::new(buffer), &CancelToken::new())
            .unwrap();
        assert_eq!(reread, lp);
    }
}

#[test]
fn runner_completes_fixture() {
    let config = AnalysisConfig {
        seed: Some(7),
        tree_depth_trials: 200,
        ..Default::default()
    };
    let representations = config.representations.clone();
    let record = TaskRunner::new(config).run(&fixture());
    assert_eq!(record.state, TaskState::Completed);
    assert_eq!(record.lp.as_ref().map(|lp| lp.num_vars), Some(7));

    for &representation in &representations {
        let stats = record.graph(representation).unwrap();
        for (lower, upper) in [
            (stats.treewidth_lb, stats.treewidth_ub),
            (stats.torso_width_lb, stats.torso_width_ub),
            (stats.tree_depth_lb, stats.tree_depth_ub),
        ] {
            let (lower, upper) = (lower.unwrap(), upper.unwrap());
            assert!(lower <= upper, "{representation}: {lower} > {upper}");
        }
    }

    let fields = record.fields(&representations);
    assert_eq!(fields.len(), InstanceRecord::header(&representations).len());
    assert!(fields.iter().skip(3).take(fields.len() - 4).all(|f| !f.is_empty()));
}
