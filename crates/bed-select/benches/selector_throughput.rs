use bed_core::rng::RngHandle;
use bed_graph::{erdos_renyi, observational_essential_graph};
use bed_mec::SamplingMode;
use bed_select::{
    lazy_discrete_random_greedy, lazy_greedy_separating_system, EdgeOrientObjective, SystemKind,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn selector_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(11);
    let dag = erdos_renyi(15, 0.3, &mut rng).unwrap();
    let cpdag = observational_essential_graph(&dag);
    let objective = EdgeOrientObjective::sampled(&cpdag, 40, SamplingMode::Exact, &mut rng).unwrap();

    c.bench_function("lazy_greedy_graph_aware_er15", |b| {
        let mut rng = RngHandle::from_seed(1);
        b.iter(|| {
            black_box(
                lazy_greedy_separating_system(&cpdag, 5, 3, SystemKind::GraphAware, &objective, &mut rng)
                    .unwrap(),
            )
        });
    });
    c.bench_function("lazy_drg_er15", |b| {
        let mut rng = RngHandle::from_seed(2);
        b.iter(|| black_box(lazy_discrete_random_greedy(15, 5, 3, &objective, &mut rng).unwrap()));
    });
}

criterion_group!(benches, selector_bench);
criterion_main!(benches);
