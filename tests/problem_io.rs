//! End-to-end tests: Matrix Market file on disk, runtime precision selection,
//! text report and JSON export.

use std::fs;
use std::path::PathBuf;

use precision_cg::config::SolverOptions;
use precision_cg::context::{PrecisionKind, Problem};
use precision_cg::io::{export_convergence, write_report};
use precision_cg::KError;

const BCSSTK_LIKE: &str = "%%MatrixMarket matrix coordinate real symmetric
% small SPD test matrix, lower triangle only
4 4 7
1 1 1.0D+01
2 1 -2.0
2 2 8.0
3 2 -1.5
3 3 6.0
4 3 1.0
4 4 5.0
";

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("precision_cg_{tag}_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn loaded_problem_solves_in_every_precision() {
    let dir = scratch_dir("load");
    let path = dir.join("small.mtx");
    fs::write(&path, BCSSTK_LIKE).unwrap();

    let problem = Problem::load(&path, "small").unwrap();
    assert_eq!(problem.dim(), 4);
    assert!(problem.matrix::<precision_cg::Qx>().unwrap().is_symmetric());

    let opts = SolverOptions { max_iter: 100, tolerance: 1e-13 };
    for run in problem.run_all(&PrecisionKind::ALL, &opts).unwrap() {
        assert!(run.result.converged, "[{}] did not converge", run.kind);
        assert!(run.result.iterations <= 6, "[{}] {} iterations", run.kind, run.result.iterations);
        for xi in &run.solution {
            assert!((xi - 1.0).abs() < 1e-12, "[{}] x = {:?}", run.kind, run.solution);
        }
    }
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_and_malformed_files_are_errors() {
    assert!(matches!(Problem::load("/nonexistent/nope.mtx", "nope"), Err(KError::Io(_))));

    let dir = scratch_dir("bad");
    let path = dir.join("bad.mtx");
    fs::write(&path, "%%MatrixMarket matrix coordinate real general\n2 2 1\n5 5 1.0\n").unwrap();
    assert!(matches!(Problem::load(&path, "bad"), Err(KError::IndexOutOfBounds { .. })));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn exported_history_matches_the_run() {
    let problem = Problem::from_triplets(
        "diag",
        3,
        vec![(0, 0, 2.0), (1, 1, 3.0), (2, 2, 5.0), (0, 1, 0.5), (1, 0, 0.5)],
    )
    .unwrap();
    let run = problem.run(PrecisionKind::Dd, &SolverOptions { max_iter: 10, tolerance: 1e-25 }).unwrap();

    let dir = scratch_dir("export");
    let path = dir.join("nested").join("diag_dd.json");
    export_convergence(&run.result, &path, &problem.name, run.kind).unwrap();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(v["metadata"]["matrix_name"], "diag");
    assert_eq!(v["metadata"]["precision_name"], "dd");
    assert_eq!(v["metadata"]["precision_digits"], 30);
    assert_eq!(v["metadata"]["converged"], run.result.converged);
    assert_eq!(v["metadata"]["iterations_performed"], run.result.iterations);
    let hist = v["convergence"]["hist_relres_2"].as_array().unwrap();
    assert_eq!(hist.len(), run.result.iterations + 1);
    assert_eq!(v["convergence"]["iter_final"], run.result.iterations);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn report_names_the_problem_and_outcome() {
    let problem = Problem::from_triplets("id2", 2, vec![(0, 0, 1.0), (1, 1, 1.0)]).unwrap();
    let run = problem.run(PrecisionKind::Qx, &SolverOptions::default()).unwrap();
    let mut out = Vec::new();
    write_report(&mut out, &run.result, &problem.name).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Problem: id2"));
    assert!(text.contains("Converged! (iter = 1)"), "{text}");
}
