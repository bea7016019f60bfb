use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use bed_core::rng::RngHandle;
use bed_exp::{
    default_suite, draw_ground_truth, load_dream_dag, record_value, result_key, run_experiment,
    scoring_members, ExperimentConfig, GeneratorSpec, Method,
};
use bed_graph::{canonical_dag_hash, chain_no_colliders, observational_essential_graph};
use bed_mec::mec_size;
use tempfile::tempdir;

fn chain_config() -> ExperimentConfig {
    let mut config = ExperimentConfig::new(
        5,
        GeneratorSpec::Chain,
        vec![Method::Rand, Method::SsA, Method::SsB, Method::Drg],
        vec![1, 2],
    );
    config.name = "chain".to_string();
    config.b_range = vec![1, 2];
    config.repeats = 2;
    config.objective_samples = 6;
    config
}

#[test]
fn every_cell_gets_one_value_per_repeat() {
    let config = chain_config();
    let report = run_experiment(&config, 11).unwrap();

    assert_eq!(report.name, "chain");
    assert_eq!(report.ovs.len(), 16);
    for (key, values) in &report.ovs {
        assert_eq!(values.len(), 2, "{key}");
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)), "{key}: {values:?}");
    }
    assert_eq!(report.invalid_draws, vec![0, 0]);
    assert_eq!(report.provenance.seed, 11);
    assert_eq!(report.provenance.graph_hashes.len(), 2);
    assert_eq!(report.provenance.input_hash.len(), 64);

    // prefix methods run once, at the largest batch size
    assert!(report.times[&result_key(1, 1, Method::SsA)].is_empty());
    assert_eq!(report.times[&result_key(2, 1, Method::SsA)].len(), 2);
    assert_eq!(report.times[&result_key(1, 1, Method::Rand)].len(), 2);
}

#[test]
fn prefix_scores_grow_with_batch_size() {
    let report = run_experiment(&chain_config(), 5).unwrap();
    for method in [Method::SsA, Method::SsB, Method::Drg] {
        for k in [1, 2] {
            let short = &report.ovs[&result_key(1, k, method)];
            let long = &report.ovs[&result_key(2, k, method)];
            for (a, b) in short.iter().zip(long) {
                assert!(a <= b, "{method} k={k}: {a} > {b}");
            }
        }
    }
}

#[test]
fn ss_a_keeps_best_smaller_budget() {
    let report = run_experiment(&chain_config(), 3).unwrap();
    for b in [1, 2] {
        let small = &report.ovs[&result_key(b, 1, Method::SsA)];
        let large = &report.ovs[&result_key(b, 2, Method::SsA)];
        for (a, c) in small.iter().zip(large) {
            assert!(a <= c);
        }
    }
}

#[test]
fn same_seed_reproduces_values() {
    let config = chain_config();
    let first = run_experiment(&config, 99).unwrap();
    let second = run_experiment(&config, 99).unwrap();
    assert_eq!(first.ovs, second.ovs);
    assert_eq!(first.provenance.graph_hashes, second.provenance.graph_hashes);
    assert_eq!(first.provenance.input_hash, second.provenance.input_hash);
}

#[test]
fn record_value_falls_back_for_keeping_methods_only() {
    let mut ovs = BTreeMap::new();
    let k_range = [1, 2, 3];
    record_value(&mut ovs, 1, 1, Method::SsA, 0.8, &k_range);
    record_value(&mut ovs, 1, 2, Method::SsA, 0.5, &k_range);
    record_value(&mut ovs, 1, 3, Method::SsA, 0.9, &k_range);
    assert_eq!(ovs[&result_key(1, 2, Method::SsA)], vec![0.8]);
    assert_eq!(ovs[&result_key(1, 3, Method::SsA)], vec![0.9]);

    record_value(&mut ovs, 1, 1, Method::SsB, 0.8, &k_range);
    record_value(&mut ovs, 1, 2, Method::SsB, 0.5, &k_range);
    assert_eq!(ovs[&result_key(1, 2, Method::SsB)], vec![0.5]);
    assert_eq!(result_key(3, 2, Method::SsBCont), "b=3_k=2_ss_b_cont");
}

#[test]
fn empty_graphs_exhaust_the_draw_budget() {
    let mut config = ExperimentConfig::new(5, GeneratorSpec::ErdosRenyi { p: 0.0 }, vec![Method::Rand], vec![1]);
    config.max_draws = 3;
    let mut rng = RngHandle::from_seed(1);
    let err = draw_ground_truth(&config, &mut rng).unwrap_err();
    assert_eq!(err.code(), "no-valid-dag");
}

#[test]
fn drawn_truths_fall_inside_the_class_size_window() {
    let config = ExperimentConfig::new(8, GeneratorSpec::ErdosRenyi { p: 0.25 }, vec![Method::Rand], vec![1]);
    let (lower, upper) = config.mec_filter.bounds(config.nodes);
    assert_eq!((lower, upper), (10, 100));

    let mut rejected = 0;
    for seed in 0..4 {
        let mut rng = RngHandle::from_seed(seed);
        let truth = draw_ground_truth(&config, &mut rng).unwrap();
        let size = mec_size(&truth.cpdag).unwrap();
        assert!((lower as u128..=upper as u128).contains(&size), "seed {seed}: size {size}");
        assert!(truth.max_score > 0);
        rejected += truth.rejected;
    }
    assert!(rejected > 0);
}

#[test]
fn disabled_window_accepts_any_class_with_undirected_edges() {
    let mut config = ExperimentConfig::new(8, GeneratorSpec::ErdosRenyi { p: 0.25 }, vec![Method::Rand], vec![1]);
    config.mec_filter.enabled = false;
    let mut rng = RngHandle::from_seed(3);
    let truth = draw_ground_truth(&config, &mut rng).unwrap();
    assert!(truth.max_score > 0);
    assert_eq!(truth.max_score, truth.cpdag.num_undirected());
}

#[test]
fn large_classes_are_scored_on_a_sample() {
    let cpdag = observational_essential_graph(&chain_no_colliders(6).unwrap());
    let mut rng = RngHandle::from_seed(8);

    let all = scoring_members(&cpdag, 10, &mut rng).unwrap();
    assert_eq!(all.len(), 6);
    let distinct: BTreeSet<String> = all.iter().map(canonical_dag_hash).collect();
    assert_eq!(distinct.len(), 6);

    let sampled = scoring_members(&cpdag, 4, &mut rng).unwrap();
    assert_eq!(sampled.len(), 4);
    for dag in &sampled {
        assert_eq!(observational_essential_graph(dag), cpdag);
    }
}

#[test]
fn dream_loader_skips_cycles_and_self_loops() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gold.tsv");
    fs::write(&path, "G1\tG2\t+\nG2\tG3\t-\nG3\tG1\t+\nG2\tG2\t+\nG1\tG2\t+\n").unwrap();
    let dag = load_dream_dag(&path, 3).unwrap();
    assert_eq!(dag.edges(), vec![(0, 1), (1, 2)]);

    fs::write(&path, "G1\tG4\t+\n").unwrap();
    assert_eq!(load_dream_dag(&path, 3).unwrap_err().code(), "dream-gene");
    assert_eq!(
        load_dream_dag(&dir.path().join("missing.tsv"), 3).unwrap_err().code(),
        "dream-read"
    );
}

#[test]
fn dream_experiment_scores_against_the_gold_standard() {
    let dir = tempdir().unwrap();
    let network = GeneratorSpec::Dream { index: 2 };
    let file = network.dream_file().unwrap();
    // 0 -> 1 -> 2 -> 3 with 0 -> 2: no v-structures, every edge undirected
    fs::write(dir.path().join(file), "G1\tG2\t+\nG2\tG3\t+\nG3\tG4\t+\nG1\tG3\t-\n").unwrap();

    let mut config = ExperimentConfig::new(4, network, vec![Method::Rand, Method::SsB], vec![1]);
    config.b_range = vec![1];
    config.repeats = 1;
    config.objective_samples = 4;
    config.dream_dir = Some(dir.path().to_path_buf());
    let report = run_experiment(&config, 0).unwrap();
    assert_eq!(report.invalid_draws, vec![0]);
    assert_eq!(report.ovs[&result_key(1, 1, Method::SsB)].len(), 1);
}

#[test]
fn default_suite_layout() {
    let suite = default_suite(2, None);
    assert_eq!(suite.len(), 13);
    assert!(suite.iter().all(|config| config.validate().is_ok()));
    assert_eq!(suite[0].name, "tree_n=10_2");
    assert!(suite.iter().filter(|config| config.nodes == 40).all(|config| {
        config.k_range == vec![1, 2, 3, 4, 5] && !matches!(config.generator, GeneratorSpec::KStar)
    }));

    let dir = tempdir().unwrap();
    let with_dream = default_suite(2, Some(dir.path()));
    assert_eq!(with_dream.len(), 14);
    let dream = with_dream.last().unwrap();
    assert_eq!(dream.generator, GeneratorSpec::Dream { index: 3 });
    assert_eq!(dream.nodes, 50);
    assert_eq!(dream.methods, vec![Method::Rand, Method::SsA, Method::SsB, Method::Cont]);
}
