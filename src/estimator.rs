//! Monte Carlo estimation of expected utility
//!
//! This is the innermost primitive of both solvers: for a fixed pair of
//! strategies it draws outcomes from a conditional law and averages the
//! player's utility over them.

use rand::RngCore;

use crate::{
    model::{ProbabilityModel, Role, Utility},
    utils::mean,
    Result, SolverError,
};

/// Estimates `E[utility(strategy, theta)]` with `theta ~ p(theta | defense, attack)`
///
/// Draws `sample_size` outcomes from `probability`, evaluates `utility` at
/// the strategy of `role`, and returns the sample mean.
///
/// # Errors
///
/// * [`SolverError::InvalidSampleSize`] if `sample_size` is zero
/// * [`SolverError::Distribution`] if either model fails, returns a sample of
///   the wrong length, or produces a non-finite value
///
/// # Example
///
/// ```
/// use ara_mcmc::{estimate_utility, Role};
/// use rand::{rngs::StdRng, RngCore, SeedableRng};
///
/// let utility = |_a: f64, theta: &[f64]| theta.to_vec();
/// let law = |d: f64, a: f64, size: usize, _rng: &mut dyn RngCore| vec![d - a; size];
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let psi = estimate_utility(&utility, &law, Role::Attacker, 1.0, 0.25, 100, &mut rng).unwrap();
/// assert_eq!(psi, 0.75);
/// ```
pub fn estimate_utility<U, P>(
    utility: &U,
    probability: &P,
    role: Role,
    defense: f64,
    attack: f64,
    sample_size: usize,
    rng: &mut dyn RngCore,
) -> Result<f64>
where
    U: Utility + ?Sized,
    P: ProbabilityModel + ?Sized,
{
    if sample_size == 0 {
        return Err(SolverError::InvalidSampleSize(sample_size));
    }

    let theta = probability.sample(defense, attack, sample_size, rng)?;
    if theta.len() != sample_size {
        return Err(SolverError::Distribution(format!(
            "probability model returned {} outcomes, expected {}",
            theta.len(),
            sample_size
        )));
    }
    if theta.iter().any(|t| !t.is_finite()) {
        return Err(SolverError::Distribution(
            "probability model produced a non-finite outcome".to_string(),
        ));
    }

    let values = utility.evaluate(role.strategy(defense, attack), &theta)?;
    if values.len() != theta.len() {
        return Err(SolverError::Distribution(format!(
            "utility returned {} values for {} outcomes",
            values.len(),
            theta.len()
        )));
    }

    let estimate = mean(&values);
    if !estimate.is_finite() {
        return Err(SolverError::Distribution(
            "utility produced a non-finite value".to_string(),
        ));
    }
    Ok(estimate)
}
