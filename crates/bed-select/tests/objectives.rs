use bed_graph::{chain_no_colliders, observational_essential_graph, Pdag};
use bed_mec::enumerate_dags;
use bed_select::{mean_oriented_gain, EdgeOrientObjective, MutualInfoObjective, Objective};

fn chain_class() -> (Pdag, Vec<bed_graph::Dag>) {
    let cpdag = observational_essential_graph(&chain_no_colliders(3).unwrap());
    let members = enumerate_dags(&cpdag, 10).unwrap();
    assert_eq!(members.len(), 3);
    (cpdag, members)
}

#[test]
fn edge_orienting_value_averages_over_the_class() {
    let (cpdag, members) = chain_class();
    let objective = EdgeOrientObjective::from_dags(&cpdag, members.clone()).unwrap();

    assert_eq!(objective.value(&[]), 0.0);
    assert!((objective.value(&[vec![1]]) - 2.0).abs() < 1e-12);
    assert!((objective.value(&[vec![0]]) - 4.0 / 3.0).abs() < 1e-12);
    // nothing crosses the boundary of an intervention on every node
    assert_eq!(objective.value(&[vec![0, 1, 2]]), 0.0);

    let parallel = mean_oriented_gain(&cpdag, &members, &[vec![0]]);
    assert!((parallel - objective.value(&[vec![0]])).abs() < 1e-12);
}

#[test]
fn mutual_information_counts_distinguishable_members() {
    let (cpdag, members) = chain_class();
    let weights = vec![1.0 / 3.0; 3];
    let objective = MutualInfoObjective::new(vec![cpdag; 3], weights, members).unwrap();

    assert!(objective.value(&[]).abs() < 1e-9);
    assert!((objective.value(&[vec![1]]) - 3f64.log2()).abs() < 1e-9);
    // an end node only tells the chain pointing away from it apart
    let expected = 3f64.log2() - 2.0 / 3.0;
    assert!((objective.value(&[vec![0]]) - expected).abs() < 1e-9);
}

#[test]
fn bag_constructors_validate_their_inputs() {
    let (cpdag, members) = chain_class();
    let err = EdgeOrientObjective::weighted(vec![cpdag.clone()], vec![0.5, 0.5], members).unwrap_err();
    assert_eq!(err.code(), "bag-mismatch");

    let err = EdgeOrientObjective::from_dags(&cpdag, Vec::new()).unwrap_err();
    assert_eq!(err.code(), "empty-bag");
}
