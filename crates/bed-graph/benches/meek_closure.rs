use bed_core::rng::RngHandle;
use bed_graph::{erdos_renyi, observational_essential_graph, oriented_gain};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn meek_closure_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(42);
    let dag = erdos_renyi(40, 0.1, &mut rng).unwrap();
    let cpdag = observational_essential_graph(&dag);

    c.bench_function("essential_graph_er40", |b| {
        b.iter(|| black_box(observational_essential_graph(&dag)));
    });
    c.bench_function("intervention_gain_er40", |b| {
        b.iter(|| black_box(oriented_gain(&dag, &cpdag, &[vec![0, 5, 11], vec![3, 17]])));
    });
}

criterion_group!(benches, meek_closure_bench);
criterion_main!(benches);
