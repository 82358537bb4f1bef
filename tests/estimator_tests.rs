use ara_mcmc::{estimate_utility, utils::variance, ProbabilityModel, Role, SolverError, Utility};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

fn identity(_x: f64, theta: &[f64]) -> Vec<f64> {
    theta.to_vec()
}

fn difference(d: f64, a: f64, size: usize, _rng: &mut dyn RngCore) -> Vec<f64> {
    vec![d - a; size]
}

/// Outcome law that always returns one sample too few
struct ShortLaw;

impl ProbabilityModel for ShortLaw {
    fn sample(
        &self,
        _defense: f64,
        _attack: f64,
        size: usize,
        _rng: &mut dyn RngCore,
    ) -> ara_mcmc::Result<Vec<f64>> {
        Ok(vec![0.0; size - 1])
    }
}

/// Outcome law that reports its own failure
struct FailingLaw;

impl ProbabilityModel for FailingLaw {
    fn sample(
        &self,
        _defense: f64,
        _attack: f64,
        _size: usize,
        _rng: &mut dyn RngCore,
    ) -> ara_mcmc::Result<Vec<f64>> {
        Err(SolverError::Distribution("shape parameter out of range".to_string()))
    }
}

/// Utility that takes a logarithm, undefined for non-positive outcomes
struct LogUtility;

impl Utility for LogUtility {
    fn evaluate(&self, _strategy: f64, theta: &[f64]) -> ara_mcmc::Result<Vec<f64>> {
        Ok(theta.iter().map(|t| t.ln()).collect())
    }
}

#[test]
fn test_constant_law_gives_exact_expectation() {
    let mut rng = StdRng::seed_from_u64(0);

    // Sample size does not matter for a degenerate law
    for size in [1, 10, 1000] {
        let psi = estimate_utility(&identity, &difference, Role::Attacker, 3.0, 1.0, size, &mut rng)
            .unwrap();
        assert!((psi - 2.0).abs() < 1e-12);
    }
}

#[test]
fn test_role_selects_strategy_passed_to_utility() {
    let mut rng = StdRng::seed_from_u64(0);
    let strategy_only = |x: f64, theta: &[f64]| vec![x; theta.len()];
    let zeros = |_d: f64, _a: f64, size: usize, _rng: &mut dyn RngCore| vec![0.0; size];

    let as_defender =
        estimate_utility(&strategy_only, &zeros, Role::Defender, 0.3, 0.7, 5, &mut rng).unwrap();
    let as_attacker =
        estimate_utility(&strategy_only, &zeros, Role::Attacker, 0.3, 0.7, 5, &mut rng).unwrap();

    assert!((as_defender - 0.3).abs() < 1e-12);
    assert!((as_attacker - 0.7).abs() < 1e-12);
}

#[test]
fn test_zero_sample_size_is_rejected() {
    let mut rng = StdRng::seed_from_u64(0);
    let result = estimate_utility(&identity, &difference, Role::Attacker, 0.0, 0.0, 0, &mut rng);
    assert!(matches!(result, Err(SolverError::InvalidSampleSize(0))));
}

#[test]
fn test_wrong_sample_length_is_a_distribution_error() {
    let mut rng = StdRng::seed_from_u64(0);
    let result = estimate_utility(&identity, &ShortLaw, Role::Defender, 0.0, 0.0, 10, &mut rng);
    assert!(matches!(result, Err(SolverError::Distribution(_))));
}

#[test]
fn test_model_failure_is_surfaced_unchanged() {
    let mut rng = StdRng::seed_from_u64(0);
    let result = estimate_utility(&identity, &FailingLaw, Role::Defender, 0.0, 0.0, 10, &mut rng);
    match result {
        Err(SolverError::Distribution(msg)) => assert!(msg.contains("shape parameter")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_non_finite_utility_is_a_distribution_error() {
    let mut rng = StdRng::seed_from_u64(0);
    // ln(0) = -inf
    let result = estimate_utility(&LogUtility, &difference, Role::Defender, 1.0, 1.0, 10, &mut rng);
    assert!(matches!(result, Err(SolverError::Distribution(_))));
}

#[test]
fn test_non_finite_outcome_is_a_distribution_error() {
    let mut rng = StdRng::seed_from_u64(0);
    let nan_law = |_d: f64, _a: f64, size: usize, _rng: &mut dyn RngCore| vec![f64::NAN; size];
    let result = estimate_utility(&identity, &nan_law, Role::Attacker, 0.0, 0.0, 3, &mut rng);
    assert!(matches!(result, Err(SolverError::Distribution(_))));
}

#[test]
fn test_variance_shrinks_with_sample_size() {
    let uniform = |_d: f64, _a: f64, size: usize, rng: &mut dyn RngCore| {
        (0..size).map(|_| rng.gen::<f64>()).collect::<Vec<_>>()
    };

    let spread = |size: usize| {
        let estimates: Vec<f64> = (0..50)
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                estimate_utility(&identity, &uniform, Role::Attacker, 0.0, 0.0, size, &mut rng)
                    .unwrap()
            })
            .collect();
        variance(&estimates)
    };

    let small = spread(10);
    let medium = spread(100);
    let large = spread(1000);

    assert!(small > medium, "{} <= {}", small, medium);
    assert!(medium > large, "{} <= {}", medium, large);
}

#[test]
fn test_same_seed_gives_identical_estimates() {
    let noisy = |_d: f64, a: f64, size: usize, rng: &mut dyn RngCore| {
        (0..size).map(|_| a + rng.gen_range(-1.0..1.0)).collect::<Vec<_>>()
    };

    let first = estimate_utility(
        &identity,
        &noisy,
        Role::Attacker,
        0.0,
        0.5,
        100,
        &mut StdRng::seed_from_u64(42),
    )
    .unwrap();
    let second = estimate_utility(
        &identity,
        &noisy,
        Role::Attacker,
        0.0,
        0.5,
        100,
        &mut StdRng::seed_from_u64(42),
    )
    .unwrap();

    assert_eq!(first.to_bits(), second.to_bits());
}
