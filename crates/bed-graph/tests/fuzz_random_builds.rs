use bed_core::rng::RngHandle;
use bed_graph::{
    canonical_dag_hash, dag_from_bytes, dag_from_json, dag_to_bytes, dag_to_json, erdos_renyi,
    observational_essential_graph, orient_from_interventions, pdag_from_json, pdag_to_json,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn essential_graph_is_consistent(seed in any::<u64>(), nodes in 2usize..9, density in 0.1f64..0.9) {
        let mut rng = RngHandle::from_seed(seed);
        let dag = erdos_renyi(nodes, density, &mut rng).unwrap();
        let cpdag = observational_essential_graph(&dag);

        prop_assert_eq!(cpdag.num_directed() + cpdag.num_undirected(), dag.num_edges());
        for (u, v) in cpdag.directed_edges() {
            prop_assert!(dag.has_edge(u, v));
        }

        let mut oriented = cpdag.clone();
        let singletons: Vec<Vec<usize>> = (0..nodes).map(|v| vec![v]).collect();
        orient_from_interventions(&dag, &mut oriented, &singletons);
        prop_assert!(oriented.is_fully_directed());
        prop_assert_eq!(oriented.to_dag().unwrap(), dag.clone());
    }

    #[test]
    fn serialization_round_trips(seed in any::<u64>(), nodes in 1usize..12) {
        let mut rng = RngHandle::from_seed(seed);
        let dag = erdos_renyi(nodes, 0.4, &mut rng).unwrap();
        let from_bytes = dag_from_bytes(&dag_to_bytes(&dag).unwrap()).unwrap();
        let from_json = dag_from_json(&dag_to_json(&dag).unwrap()).unwrap();
        prop_assert_eq!(canonical_dag_hash(&dag), canonical_dag_hash(&from_bytes));
        prop_assert_eq!(&dag, &from_json);

        let cpdag = observational_essential_graph(&dag);
        prop_assert_eq!(pdag_from_json(&pdag_to_json(&cpdag).unwrap()).unwrap(), cpdag);
    }
}

#[test]
fn cyclic_json_is_rejected() {
    let json = r#"{"nodes": 3, "edges": [[0, 1], [1, 2], [2, 0]]}"#;
    assert!(dag_from_json(json).is_err());
}
