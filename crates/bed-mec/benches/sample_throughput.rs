use bed_core::rng::RngHandle;
use bed_graph::{erdos_renyi, observational_essential_graph};
use bed_mec::{mec_size, MecSampler, SamplingMode};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sample_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(42);
    let dag = erdos_renyi(20, 0.25, &mut rng).unwrap();
    let cpdag = observational_essential_graph(&dag);

    c.bench_function("mec_size_er20", |b| {
        b.iter(|| black_box(mec_size(&cpdag).unwrap()));
    });
    c.bench_function("exact_sample_er20", |b| {
        let mut sampler = MecSampler::new(&cpdag, SamplingMode::Exact);
        let mut rng = RngHandle::from_seed(7);
        b.iter(|| black_box(sampler.sample(&mut rng).unwrap()));
    });
}

criterion_group!(benches, sample_bench);
criterion_main!(benches);
