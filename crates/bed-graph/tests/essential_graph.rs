use bed_graph::{
    chain_no_colliders, fully_connected, observational_essential_graph, orient_from_interventions,
    oriented_gain, Dag,
};

#[test]
fn chain_is_fully_undirected() {
    let dag = chain_no_colliders(4).unwrap();
    let cpdag = observational_essential_graph(&dag);
    assert_eq!(cpdag.num_directed(), 0);
    assert_eq!(cpdag.num_undirected(), 3);
    assert_eq!(cpdag.undirected_components(), vec![vec![0, 1, 2, 3]]);
}

#[test]
fn collider_is_identified() {
    let dag = Dag::from_edges(4, &[(0, 2), (1, 2), (2, 3)]).unwrap();
    let cpdag = observational_essential_graph(&dag);
    assert!(cpdag.is_directed(0, 2));
    assert!(cpdag.is_directed(1, 2));
    // R1 carries the collider down the chain.
    assert!(cpdag.is_directed(2, 3));
    assert!(cpdag.is_fully_directed());
    assert_eq!(cpdag.to_dag().unwrap(), dag);
}

#[test]
fn shielded_collider_stays_undirected() {
    let dag = fully_connected(3).unwrap();
    let cpdag = observational_essential_graph(&dag);
    assert_eq!(cpdag.num_undirected(), 3);
    assert!(cpdag.to_dag().is_err());
}

#[test]
fn single_intervention_orients_chain() {
    let dag = chain_no_colliders(4).unwrap();
    let mut cpdag = observational_essential_graph(&dag);
    let gained = orient_from_interventions(&dag, &mut cpdag, &[vec![1]]);
    assert_eq!(gained, 3);
    assert!(cpdag.is_fully_directed());
    assert_eq!(cpdag.to_dag().unwrap(), dag);
}

#[test]
fn intervening_on_every_node_learns_nothing() {
    let dag = chain_no_colliders(4).unwrap();
    let cpdag = observational_essential_graph(&dag);
    assert_eq!(oriented_gain(&dag, &cpdag, &[vec![0, 1, 2, 3]]), 0);
    assert_eq!(oriented_gain(&dag, &cpdag, &[]), 0);
}

#[test]
fn gain_leaves_input_untouched() {
    let dag = fully_connected(4).unwrap();
    let cpdag = observational_essential_graph(&dag);
    let before = cpdag.clone();
    let gain = oriented_gain(&dag, &cpdag, &[vec![0], vec![1], vec![2]]);
    assert_eq!(gain, 6);
    assert_eq!(cpdag, before);
}

#[test]
fn out_of_range_targets_are_ignored() {
    let dag = chain_no_colliders(3).unwrap();
    let cpdag = observational_essential_graph(&dag);
    assert_eq!(oriented_gain(&dag, &cpdag, &[vec![7]]), 0);
}
