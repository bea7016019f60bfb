use bed_core::rng::RngHandle;
use bed_graph::{chain_no_colliders, observational_essential_graph};
use bed_select::{
    linear_maximization, pipage_round, DagSource, EdgeOrientObjective, InterventionMenu,
    PerturbationTargets, StochasticOracle,
};

fn chain_oracle() -> StochasticOracle {
    let dag = chain_no_colliders(3).unwrap();
    let cpdag = observational_essential_graph(&dag);
    let bag = EdgeOrientObjective::weighted(vec![cpdag], vec![1.0], vec![dag]).unwrap();
    StochasticOracle::new(DagSource::Bag(bag), 1)
}

#[test]
fn gradient_at_origin_is_the_singleton_gain() {
    let mut oracle = chain_oracle();
    let mut rng = RngHandle::from_seed(0);
    let ground = PerturbationTargets::new(3, &[]);
    let grad = oracle.gradient(&ground, &[0.0; 3], &mut rng).unwrap();
    assert_eq!(grad, vec![2.0, 2.0, 1.0]);
}

#[test]
fn hessian_is_symmetric_with_exact_second_differences() {
    let mut oracle = chain_oracle();
    let mut rng = RngHandle::from_seed(0);
    let ground = PerturbationTargets::new(3, &[]);
    let hess = oracle
        .hessian(&ground, &[0.0; 3], &[0.5; 3], &mut rng)
        .unwrap();
    let expected = vec![
        vec![0.0, -3.0, -1.0],
        vec![-3.0, 0.0, -1.0],
        vec![-1.0, -1.0, 0.0],
    ];
    assert_eq!(hess, expected);
}

#[test]
fn menu_gradient_scores_whole_interventions() {
    let mut oracle = chain_oracle();
    let mut rng = RngHandle::from_seed(0);
    let menu = vec![vec![0], vec![1, 2]];
    let grad = oracle
        .gradient(&InterventionMenu::new(&menu), &[0.0, 0.0], &mut rng)
        .unwrap();
    assert_eq!(grad, vec![2.0, 2.0]);
}

#[test]
fn mismatched_points_are_rejected() {
    let mut oracle = chain_oracle();
    let mut rng = RngHandle::from_seed(0);
    let err = oracle
        .gradient(&PerturbationTargets::new(3, &[]), &[0.0; 2], &mut rng)
        .unwrap_err();
    assert_eq!(err.code(), "dimension-mismatch");
}

#[test]
fn linear_oracle_fills_the_best_coordinates() {
    let grad = [0.5, -1.0, 2.0, 1.0];
    assert_eq!(linear_maximization(&grad, 2.0, &[1.0; 4]), vec![0.0, 0.0, 1.0, 1.0]);
    assert_eq!(linear_maximization(&grad, 1.5, &[1.0; 4]), vec![0.0, 0.0, 1.0, 0.5]);
    assert_eq!(
        linear_maximization(&grad, 2.0, &[1.0, 1.0, 0.25, 1.0]),
        vec![0.75, 0.0, 0.25, 1.0]
    );
}

#[test]
fn pipage_rounding_keeps_the_mass_of_integral_sums() {
    for seed in 0..20 {
        let mut rng = RngHandle::from_seed(seed);
        let halves = pipage_round(&[0.5, 0.5], 1, &mut rng);
        assert_eq!(halves.iter().filter(|&&b| b).count(), 1);
        let quarters = pipage_round(&[0.25; 4], 1, &mut rng);
        assert_eq!(quarters.iter().filter(|&&b| b).count(), 1);
        let mixed = pipage_round(&[1.0, 0.5, 0.5, 0.0], 2, &mut rng);
        assert!(mixed[0] && !mixed[3]);
        assert_eq!(mixed.iter().filter(|&&b| b).count(), 2);
    }
}

#[test]
fn lone_fractional_coordinate_is_taken_when_nothing_else_is() {
    let mut rng = RngHandle::from_seed(5);
    assert_eq!(pipage_round(&[0.6, 0.0, 0.0], 3, &mut rng), vec![true, false, false]);
    assert_eq!(pipage_round(&[1.0, 0.0, 1.0], 2, &mut rng), vec![true, false, true]);
}
