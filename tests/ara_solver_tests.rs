use ara_mcmc::{
    mcmc_ara, AraSolver, DecisionModel, RandomDecisionModel, SolverConfig, SolverError,
    StrategyGrid, Utility,
};
use rand::{Rng, RngCore};

fn identity(_x: f64, theta: &[f64]) -> Vec<f64> {
    theta.to_vec()
}

fn difference(d: f64, a: f64, size: usize, _rng: &mut dyn RngCore) -> Vec<f64> {
    vec![d - a; size]
}

/// Attack payoff peaking at `a = 0.5`, observed with uniform noise
fn humped(_d: f64, a: f64, size: usize, rng: &mut dyn RngCore) -> Vec<f64> {
    (0..size)
        .map(|_| a * (1.0 - a) + rng.gen_range(-0.5..0.5))
        .collect()
}

fn grid(values: &[f64], name: &'static str) -> StrategyGrid {
    StrategyGrid::new(values.to_vec(), name).unwrap()
}

/// A possible attacker valuing the outcome with a random weight and a random
/// attack cost
#[derive(Debug, Clone)]
struct WeightedAttacker {
    weight: f64,
    cost: f64,
}

impl Utility for WeightedAttacker {
    fn evaluate(&self, strategy: f64, theta: &[f64]) -> ara_mcmc::Result<Vec<f64>> {
        Ok(theta
            .iter()
            .map(|t| self.weight * t - self.cost * strategy)
            .collect())
    }
}

fn weighted_attacker(rng: &mut dyn RngCore) -> WeightedAttacker {
    WeightedAttacker {
        weight: rng.gen_range(0.5..1.5),
        cost: rng.gen_range(0.0..2.0),
    }
}

/// The attacker believes the outcome is `a - d` shifted by a random bias
fn biased_belief(_d: f64, rng: &mut dyn RngCore) -> impl Fn(f64, f64, usize, &mut dyn RngCore) -> Vec<f64> {
    let bias: f64 = rng.gen_range(-0.2..0.2);
    move |d: f64, a: f64, size: usize, rng: &mut dyn RngCore| {
        (0..size)
            .map(|_| a - d + bias + rng.gen_range(-0.1..0.1))
            .collect::<Vec<_>>()
    }
}

type UtilityFn = fn(f64, &[f64]) -> Vec<f64>;
type LawFn = fn(f64, f64, usize, &mut dyn RngCore) -> Vec<f64>;

/// The defender's utility is the outcome `d - a` itself
fn defender() -> DecisionModel<UtilityFn, LawFn> {
    DecisionModel::new(identity as UtilityFn, difference as LawFn)
}

#[test]
fn test_rows_of_p_a_sum_to_one() {
    let attacker = RandomDecisionModel::new(weighted_attacker, biased_belief);
    let d_values = StrategyGrid::arange(0.0, 1.0, 0.25, "defender").unwrap();
    let a_values = StrategyGrid::arange(0.0, 1.0, 0.2, "attacker").unwrap();

    for ara_iters in [1, 7, 50] {
        let config = SolverConfig::default()
            .with_mcmc_iters(20)
            .with_ara_iters(ara_iters)
            .with_seed(11);
        let solution = mcmc_ara(&d_values, &a_values, &defender(), &attacker, &config).unwrap();

        assert_eq!(solution.p_a.rows(), d_values.len());
        assert_eq!(solution.p_a.cols(), a_values.len());
        for i in 0..d_values.len() {
            let row = solution.attack_distribution(i);
            assert!(row.iter().all(|p| *p >= 0.0));
            assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_fixed_attacker_collapses_to_one_hot() {
    // Every possible attacker is the same deterministic one
    let attacker = RandomDecisionModel::new(
        |_rng: &mut dyn RngCore| identity,
        |_d: f64, _rng: &mut dyn RngCore| difference,
    );
    let mut solver = AraSolver::new(
        grid(&[0.0, 1.0, 2.0], "defender"),
        grid(&[1.0, -2.0, 0.5], "attacker"),
        SolverConfig::default()
            .with_mcmc_iters(3)
            .with_ara_iters(1000)
            .with_seed(8),
    );

    let solution = solver.solve(&defender(), &attacker).unwrap();

    // d - a is largest at a = -2 for every defense
    for i in 0..3 {
        assert_eq!(solution.attack_distribution(i), &[0.0, 1.0, 0.0]);
    }
}

#[test]
fn test_fixed_noisy_attacker_finds_true_best_response() {
    let attacker = RandomDecisionModel::new(
        |_rng: &mut dyn RngCore| identity,
        |_d: f64, _rng: &mut dyn RngCore| humped,
    );
    let mut solver = AraSolver::new(
        grid(&[0.0, 1.0], "defender"),
        StrategyGrid::arange(0.0, 1.01, 0.25, "attacker").unwrap(),
        SolverConfig::default()
            .with_mcmc_iters(2000)
            .with_ara_iters(200)
            .with_n_jobs(2)
            .with_seed(21),
    );

    let solution = solver.solve(&defender(), &attacker).unwrap();

    // a(1 - a) over the grid is 0, 0.1875, 0.25, 0.1875, 0
    for i in 0..2 {
        assert_eq!(solution.attack_distribution(i), &[0.0, 0.0, 1.0, 0.0, 0.0]);
    }
}

#[test]
fn test_defender_utility_is_weighted_by_p_a() {
    let attacker = RandomDecisionModel::new(weighted_attacker, biased_belief);
    let d_values = [0.0, 0.5, 1.0];
    let a_values = [0.0, 0.5, 1.0];
    let mut solver = AraSolver::new(
        grid(&d_values, "defender"),
        grid(&a_values, "attacker"),
        SolverConfig::default()
            .with_mcmc_iters(16)
            .with_ara_iters(40)
            .with_seed(99),
    );

    let solution = solver.solve(&defender(), &attacker).unwrap();

    for (i, d) in d_values.iter().enumerate() {
        for (j, a) in a_values.iter().enumerate() {
            let expected = (d - a) * solution.p_a.get(i, j);
            assert!((solution.psi_d.get(i, j) - expected).abs() < 1e-12);
        }
    }

    let totals = solution.defender_expected_utility();
    let best = totals
        .iter()
        .enumerate()
        .fold(0, |best, (i, v)| if *v > totals[best] { i } else { best });
    assert_eq!(solution.d_opt, d_values[best]);
    assert_eq!(solution.d_opt_index(), best);
}

#[test]
fn test_instance_utilities_are_kept_per_defense() {
    let attacker = RandomDecisionModel::new(weighted_attacker, biased_belief);
    let mut solver = AraSolver::new(
        grid(&[0.0, 1.0], "defender"),
        grid(&[0.0, 0.5, 1.0, 1.5], "attacker"),
        SolverConfig::default()
            .with_mcmc_iters(8)
            .with_ara_iters(12)
            .with_seed(4),
    );

    let solution = solver.solve(&defender(), &attacker).unwrap();

    assert_eq!(solution.psi_a.len(), 2);
    for (i, instances) in solution.psi_a.iter().enumerate() {
        assert_eq!(instances.rows(), 4);
        assert_eq!(instances.cols(), 12);
        // p_a is the histogram of each instance's best attack
        let best = instances.column_argmax();
        for j in 0..4 {
            let share = best.iter().filter(|b| **b == j).count() as f64 / 12.0;
            assert!((solution.p_a.get(i, j) - share).abs() < 1e-12);
        }
    }
}

#[test]
fn test_results_do_not_depend_on_pool_width() {
    let attacker = RandomDecisionModel::new(weighted_attacker, biased_belief);
    let d_values = StrategyGrid::arange(0.0, 1.0, 0.5, "defender").unwrap();
    let a_values = StrategyGrid::arange(0.0, 1.0, 0.25, "attacker").unwrap();
    let base = SolverConfig::default()
        .with_mcmc_iters(25)
        .with_ara_iters(30)
        .with_seed(1234);

    let sequential = mcmc_ara(&d_values, &a_values, &defender(), &attacker, &base).unwrap();
    let parallel = mcmc_ara(
        &d_values,
        &a_values,
        &defender(),
        &attacker,
        &base.clone().with_n_jobs(4),
    )
    .unwrap();

    assert_eq!(sequential.d_opt, parallel.d_opt);
    assert_eq!(sequential.p_a, parallel.p_a);
    assert_eq!(sequential.psi_d, parallel.psi_d);
    assert_eq!(sequential.psi_a, parallel.psi_a);
}

#[test]
fn test_probability_prior_sees_the_defense() {
    // Possible attackers believe the outcome is the defense itself
    let attacker = RandomDecisionModel::new(
        |_rng: &mut dyn RngCore| |a: f64, theta: &[f64]| theta.iter().map(|t| t * a).collect::<Vec<_>>(),
        |defense: f64, _rng: &mut dyn RngCore| {
            move |_d: f64, _a: f64, size: usize, _rng: &mut dyn RngCore| vec![defense - 0.5; size]
        },
    );
    let mut solver = AraSolver::new(
        grid(&[0.0, 1.0], "defender"),
        grid(&[-1.0, 1.0], "attacker"),
        SolverConfig::default()
            .with_mcmc_iters(2)
            .with_ara_iters(5)
            .with_seed(0),
    );

    let solution = solver.solve(&defender(), &attacker).unwrap();

    // theta = -0.5 favours a = -1, theta = 0.5 favours a = 1
    assert_eq!(solution.attack_distribution(0), &[1.0, 0.0]);
    assert_eq!(solution.attack_distribution(1), &[0.0, 1.0]);
}

/// A possible attacker whose utility is undefined for large attacks
struct Fragile;

impl Utility for Fragile {
    fn evaluate(&self, strategy: f64, theta: &[f64]) -> ara_mcmc::Result<Vec<f64>> {
        if strategy > 0.75 {
            return Err(SolverError::Distribution(format!(
                "utility undefined at attack {}",
                strategy
            )));
        }
        Ok(theta.to_vec())
    }
}

#[test]
fn test_failing_instance_aborts_the_cell() {
    let attacker = RandomDecisionModel::new(
        |_rng: &mut dyn RngCore| Fragile,
        |_d: f64, _rng: &mut dyn RngCore| difference,
    );
    let mut solver = AraSolver::new(
        grid(&[0.25], "defender"),
        grid(&[0.0, 0.5, 1.0], "attacker"),
        SolverConfig::default()
            .with_mcmc_iters(4)
            .with_ara_iters(6)
            .with_seed(2),
    );

    let err = solver.solve(&defender(), &attacker).unwrap_err();

    match &err {
        SolverError::Evaluation {
            defense,
            attack,
            source,
        } => {
            assert_eq!(*defense, 0.25);
            assert_eq!(*attack, 1.0);
            match source.as_ref() {
                SolverError::WorkerFailure { iteration, .. } => assert_eq!(*iteration, 0),
                other => panic!("unexpected source: {:?}", other),
            }
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(matches!(err.root_cause(), SolverError::Distribution(_)));
}

#[test]
fn test_empty_grid_is_rejected() {
    assert!(matches!(
        StrategyGrid::new(Vec::new(), "attacker"),
        Err(SolverError::EmptyGrid("attacker"))
    ));
}

#[test]
fn test_statistics_are_collected() {
    let attacker = RandomDecisionModel::new(weighted_attacker, biased_belief);
    let mut solver = AraSolver::new(
        grid(&[0.0, 1.0], "defender"),
        grid(&[0.0, 0.5, 1.0], "attacker"),
        SolverConfig::default()
            .with_mcmc_iters(5)
            .with_ara_iters(10)
            .with_n_jobs(2)
            .with_seed(6),
    );

    solver.solve(&defender(), &attacker).unwrap();
    let stats = solver.get_statistics();

    assert_eq!(stats.cells, 6);
    assert_eq!(stats.instances, 60);
    assert_eq!(stats.draws, 6 * 11 * 5);
    assert_eq!(stats.workers, 2);
    assert_eq!(stats.defender_times.len(), 2);
}
