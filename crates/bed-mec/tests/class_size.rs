use bed_core::BedError;
use bed_graph::{chain_no_colliders, fully_connected, observational_essential_graph, Dag, Pdag};
use bed_mec::{enumerate_dags, mec_size, MecCounter};

#[test]
fn chains_trees_and_cliques_use_closed_forms() {
    let chain = observational_essential_graph(&chain_no_colliders(6).unwrap());
    assert_eq!(mec_size(&chain).unwrap(), 6);

    let clique = observational_essential_graph(&fully_connected(5).unwrap());
    assert_eq!(mec_size(&clique).unwrap(), 120);
}

#[test]
fn fully_directed_class_has_one_member() {
    let dag = Dag::from_edges(3, &[(0, 2), (1, 2)]).unwrap();
    let cpdag = observational_essential_graph(&dag);
    assert_eq!(mec_size(&cpdag).unwrap(), 1);
    assert_eq!(enumerate_dags(&cpdag, 10).unwrap(), vec![dag]);
}

#[test]
fn diamond_is_counted_by_root_recursion() {
    // two triangles sharing the edge 1 - 2; nodes 0 and 3 are not adjacent
    let mut pdag = Pdag::empty(4);
    for (u, v) in [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)] {
        pdag.set_undirected(u, v);
    }
    let mut counter = MecCounter::new(&pdag);
    let size = counter.size().unwrap();
    // roots 0 and 3 leave the edge 1 - 2; roots 1 and 2 leave a path on three nodes
    assert_eq!(counter.rooted_size(&[0, 1, 2, 3], 0).unwrap(), 2);
    assert_eq!(counter.rooted_size(&[0, 1, 2, 3], 1).unwrap(), 3);
    assert_eq!(size, 10);
    assert_eq!(enumerate_dags(&pdag, 100).unwrap().len(), 10);
}

#[test]
fn independent_components_multiply() {
    let dag = Dag::from_edges(6, &[(0, 1), (1, 2), (3, 4), (3, 5), (4, 5)]).unwrap();
    let cpdag = observational_essential_graph(&dag);
    assert_eq!(mec_size(&cpdag).unwrap(), 3 * 6);
}

#[test]
fn huge_cliques_overflow_cleanly() {
    let clique = observational_essential_graph(&fully_connected(36).unwrap());
    let err = mec_size(&clique).unwrap_err();
    assert!(matches!(err, BedError::Mec(ref info) if info.code == "count-overflow"));
}

#[test]
fn enumeration_respects_limit() {
    let clique = observational_essential_graph(&fully_connected(5).unwrap());
    let err = enumerate_dags(&clique, 100).unwrap_err();
    assert_eq!(err.code(), "enumeration-limit");
}
