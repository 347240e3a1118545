use criterion::{black_box, criterion_group, criterion_main, Criterion};
use precision_cg::config::SolverOptions;
use precision_cg::context::{PrecisionKind, Problem};

fn laplacian(n: usize) -> Problem {
    let mut t = Vec::with_capacity(3 * n);
    for i in 0..n {
        t.push((i, i, 2.0));
        if i + 1 < n {
            t.push((i, i + 1, -1.0));
            t.push((i + 1, i, -1.0));
        }
    }
    Problem::from_triplets("laplace1d", n, t).unwrap()
}

fn bench_cg_precisions(c: &mut Criterion) {
    let problem = laplacian(100);
    let opts = SolverOptions { max_iter: 100, tolerance: 0.0 };

    let mut group = c.benchmark_group("cg_100_iterations");
    for kind in PrecisionKind::ALL {
        group.bench_function(kind.label(), |ben| {
            ben.iter(|| {
                let _run = problem.run(black_box(kind), black_box(&opts)).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cg_precisions);
criterion_main!(benches);
