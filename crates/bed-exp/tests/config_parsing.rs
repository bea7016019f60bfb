use std::fs;

use bed_exp::{load_config, ExperimentConfig, GeneratorSpec, Method, SelectionSettings};
use bed_mec::SamplingMode;
use tempfile::tempdir;

#[test]
fn minimal_yaml_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("er.yaml");
    fs::write(
        &path,
        "nodes: 10\ngenerator: ER_0.25\nmethods: [rand, ss_a, ss_b_cont]\nk_range: [1, 2]\n",
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.name, "experiment");
    assert_eq!(config.generator, GeneratorSpec::ErdosRenyi { p: 0.25 });
    assert_eq!(config.methods, vec![Method::Rand, Method::SsA, Method::SsBCont]);
    assert_eq!(config.b_range, vec![1, 2, 3, 4, 5]);
    assert_eq!(config.repeats, 10);
    assert_eq!(config.objective_samples, 40);
    assert_eq!(config.max_enumeration, 10_000);
    assert!(config.mec_filter.enabled);
    assert_eq!(config.mec_filter.bounds(10), (10, 100));
    assert_eq!(config.mec_filter.bounds(40), (20, 100));
    assert_eq!(config.continuous.iterations_per_batch, 5);
    assert_eq!(config.continuous.oracle_mode, SamplingMode::Fast);
    assert_eq!(config.continuous.params.roundings, 11);
}

#[test]
fn nested_settings_override_defaults() {
    let yaml = r#"
name: dense
nodes: 8
generator: barabasi_albert_2
methods: [scg]
k_range: [2]
b_range: [1, 3]
mec_filter:
  lower: 2
continuous:
  oracle_mode: exact
  params:
    iterations: 3
"#;
    let config: ExperimentConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.generator, GeneratorSpec::BarabasiAlbert { m: 2 });
    assert_eq!(config.mec_filter.bounds(8), (2, 100));
    assert_eq!(config.continuous.oracle_mode, SamplingMode::Exact);
    assert_eq!(config.continuous.params.iterations, 3);
    assert_eq!(config.continuous.params.initial_batch, 5);
    config.validate().unwrap();
}

#[test]
fn unknown_generator_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "nodes: 5\ngenerator: lattice\nmethods: [rand]\nk_range: [1]\n").unwrap();
    assert_eq!(load_config(&path).unwrap_err().code(), "config-parse");

    let missing = dir.path().join("absent.yaml");
    assert_eq!(load_config(&missing).unwrap_err().code(), "config-read");
}

#[test]
fn generator_names_round_trip_through_display() {
    for name in ["chain", "tree", "bipartite", "ER_0.1", "fully_connected", "barabasi_albert_3", "kstar", "dream_4"] {
        let spec: GeneratorSpec = name.parse().unwrap();
        assert_eq!(spec.to_string(), name);
    }
    assert_eq!(
        "scale_free".parse::<GeneratorSpec>().unwrap(),
        GeneratorSpec::ScaleFree { alpha: 0.41, beta: 0.54 }
    );
    for bad in ["dream_0", "dream_6", "ER_x", "barabasi_albert_", "star"] {
        assert_eq!(bad.parse::<GeneratorSpec>().unwrap_err().code(), "unknown-generator", "{bad}");
    }
}

#[test]
fn dream_generators_name_their_gold_standard() {
    let spec = GeneratorSpec::Dream { index: 3 };
    assert!(spec.is_dream());
    assert!(!spec.filters_by_mec_size());
    assert_eq!(
        spec.dream_file().as_deref(),
        Some("InSilicoSize50-Yeast1_goldstandard_signed.tsv")
    );
    assert!(GeneratorSpec::ErdosRenyi { p: 0.5 }.filters_by_mec_size());
    assert_eq!(GeneratorSpec::Tree.dream_file(), None);
}

#[test]
fn method_names_parse_and_classify() {
    for method in Method::ALL {
        assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
    }
    assert_eq!("ss_c".parse::<Method>().unwrap_err().code(), "unknown-method");
    let prefixed: Vec<Method> = Method::ALL.into_iter().filter(Method::scores_prefixes).collect();
    assert_eq!(prefixed, vec![Method::SsA, Method::SsB, Method::Cont, Method::Drg]);
    assert!(Method::SsACont.keeps_best_smaller_budget());
    assert!(!Method::SsB.keeps_best_smaller_budget());
}

#[test]
fn validation_rejects_bad_ranges() {
    let base = ExperimentConfig::new(6, GeneratorSpec::Tree, vec![Method::Rand], vec![1, 2]);
    base.validate().unwrap();

    let mut config = base.clone();
    config.nodes = 0;
    assert_eq!(config.validate().unwrap_err().code(), "empty-graph");

    let mut config = base.clone();
    config.methods.clear();
    assert_eq!(config.validate().unwrap_err().code(), "no-methods");

    let mut config = base.clone();
    config.k_range = vec![0, 1];
    assert_eq!(config.validate().unwrap_err().code(), "invalid-k-range");

    let mut config = base.clone();
    config.b_range = vec![];
    assert_eq!(config.validate().unwrap_err().code(), "invalid-b-range");

    let mut config = base.clone();
    config.b_range = vec![2, 1];
    assert_eq!(config.validate().unwrap_err().code(), "unsorted-range");

    let mut config = base.clone();
    config.repeats = 0;
    assert_eq!(config.validate().unwrap_err().code(), "invalid-count");

    let mut config = base;
    config.generator = GeneratorSpec::Dream { index: 1 };
    assert_eq!(config.validate().unwrap_err().code(), "missing-dream-dir");
}

#[test]
fn selection_settings_follow_the_experiment() {
    let mut config = ExperimentConfig::new(6, GeneratorSpec::Tree, vec![Method::Cont], vec![1]);
    assert_eq!(config.selection_settings(), SelectionSettings::default());

    config.objective_samples = 7;
    config.continuous.oracle_samples = 3;
    let settings = config.selection_settings();
    assert_eq!(settings.objective_samples, 7);
    assert_eq!(settings.continuous.oracle_samples, 3);
}
