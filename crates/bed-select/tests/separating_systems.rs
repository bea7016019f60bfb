use bed_core::rng::RngHandle;
use bed_graph::{
    erdos_renyi, observational_essential_graph, orient_from_interventions, Dag,
};
use bed_select::{generic_separating_system, graph_aware_separating_system};
use proptest::prelude::*;

fn splits(system: &[Vec<usize>], u: usize, v: usize) -> bool {
    system
        .iter()
        .any(|set| set.contains(&u) != set.contains(&v))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generic_system_separates_every_pair(n in 2usize..40, k in 1usize..10) {
        let system = generic_separating_system(n, k);
        for set in &system {
            prop_assert!(!set.is_empty());
            prop_assert!(set.len() <= k);
            prop_assert!(set.iter().all(|&v| v < n));
        }
        for u in 0..n {
            for v in (u + 1)..n {
                prop_assert!(splits(&system, u, v), "pair ({u}, {v}) not separated");
            }
        }
    }

    #[test]
    fn graph_aware_system_cuts_every_undirected_edge(seed in any::<u64>(), k in 1usize..5) {
        let mut rng = RngHandle::from_seed(seed);
        let dag = erdos_renyi(10, 0.4, &mut rng).unwrap();
        let cpdag = observational_essential_graph(&dag);
        let system = graph_aware_separating_system(&cpdag, k);

        for set in &system {
            prop_assert!(!set.is_empty() && set.len() <= k);
        }
        for (u, v) in cpdag.undirected_edges() {
            prop_assert!(splits(&system, u, v));
        }
        let mut oriented = cpdag.clone();
        orient_from_interventions(&dag, &mut oriented, &system);
        prop_assert!(oriented.is_fully_directed());
    }
}

#[test]
fn trivial_inputs_give_empty_systems() {
    assert!(generic_separating_system(0, 3).is_empty());
    assert!(generic_separating_system(1, 3).is_empty());

    let collider = Dag::from_edges(3, &[(0, 2), (1, 2)]).unwrap();
    let cpdag = observational_essential_graph(&collider);
    assert!(graph_aware_separating_system(&cpdag, 2).is_empty());
}

#[test]
fn singleton_budget_lists_every_node() {
    let system = generic_separating_system(3, 1);
    assert_eq!(system, vec![vec![0], vec![1], vec![2]]);
}
