use std::collections::BTreeSet;

use bed_core::rng::RngHandle;
use bed_graph::{canonical_dag_hash, erdos_renyi, observational_essential_graph};
use bed_mec::{enumerate_dags, mec_size};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn enumeration_matches_size_and_class(seed in any::<u64>(), nodes in 2usize..8, density in 0.2f64..0.8) {
        let mut rng = RngHandle::from_seed(seed);
        let dag = erdos_renyi(nodes, density, &mut rng).unwrap();
        let cpdag = observational_essential_graph(&dag);

        let size = mec_size(&cpdag).unwrap();
        let members = enumerate_dags(&cpdag, 10_000).unwrap();
        prop_assert_eq!(members.len() as u128, size);

        let hashes: BTreeSet<String> = members.iter().map(canonical_dag_hash).collect();
        prop_assert_eq!(hashes.len(), members.len());
        prop_assert!(hashes.contains(&canonical_dag_hash(&dag)));

        for member in &members {
            prop_assert_eq!(observational_essential_graph(member), cpdag.clone());
        }
    }
}
