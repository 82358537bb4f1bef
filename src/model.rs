//! Traits describing the decision model of each player.
//!
//! A player's decision model is a pair made of a [`Utility`] function and a
//! [`ProbabilityModel`] over the uncertain outcome `theta`. The solvers only
//! consume these through their contracts; problem-specific definitions live in
//! the caller's code.
//!
//! In the ARA setting the attacker's model is itself random: a
//! [`UtilityPrior`] and a [`ProbabilityPrior`] produce a fresh, immutable
//! instance on every draw.

use rand::RngCore;

use crate::Result;

/// Which player a utility estimate is computed for
///
/// Selects the strategy handed to the utility function: the defender's
/// utility is evaluated at `d`, the attacker's at `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The leader, who commits to a strategy first
    Defender,
    /// The follower, who best-responds to the defender's choice
    Attacker,
}

impl Role {
    /// Picks this player's own strategy out of a `(defense, attack)` pair
    pub fn strategy(self, defense: f64, attack: f64) -> f64 {
        match self {
            Role::Defender => defense,
            Role::Attacker => attack,
        }
    }
}

/// A player's utility over outcomes
///
/// Implementations must be element-wise: the returned vector has the same
/// length as `theta` and its `i`-th entry depends only on `strategy` and
/// `theta[i]`.
///
/// Plain closures `Fn(f64, &[f64]) -> Vec<f64>` implement this trait.
///
/// # Example
///
/// ```
/// use ara_mcmc::Utility;
///
/// let loss = |d: f64, theta: &[f64]| theta.iter().map(|t| -t - d).collect::<Vec<_>>();
/// assert_eq!(loss.evaluate(1.0, &[0.5, 2.0]).unwrap(), vec![-1.5, -3.0]);
/// ```
pub trait Utility {
    /// Evaluates the utility of `strategy` at every outcome in `theta`
    fn evaluate(&self, strategy: f64, theta: &[f64]) -> Result<Vec<f64>>;
}

impl<F> Utility for F
where
    F: Fn(f64, &[f64]) -> Vec<f64>,
{
    fn evaluate(&self, strategy: f64, theta: &[f64]) -> Result<Vec<f64>> {
        Ok(self(strategy, theta))
    }
}

/// Conditional law of the outcome given both strategies
///
/// Draws `size` independent samples of `theta ~ p(theta | defense, attack)`
/// using only the supplied random source, so two calls with identically
/// seeded sources return identical samples.
///
/// Plain closures `Fn(f64, f64, usize, &mut dyn RngCore) -> Vec<f64>`
/// implement this trait.
pub trait ProbabilityModel {
    /// Draws exactly `size` outcomes for the strategy pair
    fn sample(
        &self,
        defense: f64,
        attack: f64,
        size: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>>;
}

impl<F> ProbabilityModel for F
where
    F: Fn(f64, f64, usize, &mut dyn RngCore) -> Vec<f64>,
{
    fn sample(
        &self,
        defense: f64,
        attack: f64,
        size: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>> {
        Ok(self(defense, attack, size, rng))
    }
}

/// Prior over attacker utility functions
///
/// Each call to [`draw`](UtilityPrior::draw) samples latent parameters and
/// returns an independent utility instance closed over them. Priors are
/// shared between worker threads, instances are not.
pub trait UtilityPrior: Sync {
    /// The utility type produced by this prior
    type Instance: Utility;

    /// Draws a fresh utility instance
    fn draw(&self, rng: &mut dyn RngCore) -> Self::Instance;
}

impl<F, U> UtilityPrior for F
where
    F: Fn(&mut dyn RngCore) -> U + Sync,
    U: Utility,
{
    type Instance = U;

    fn draw(&self, rng: &mut dyn RngCore) -> U {
        self(rng)
    }
}

/// Prior over attacker probability models
///
/// Like [`UtilityPrior`], but the draw may condition on the defender's
/// committed strategy.
pub trait ProbabilityPrior: Sync {
    /// The probability model type produced by this prior
    type Instance: ProbabilityModel;

    /// Draws a fresh probability model, possibly conditioned on `defense`
    fn draw(&self, defense: f64, rng: &mut dyn RngCore) -> Self::Instance;
}

impl<F, P> ProbabilityPrior for F
where
    F: Fn(f64, &mut dyn RngCore) -> P + Sync,
    P: ProbabilityModel,
{
    type Instance = P;

    fn draw(&self, defense: f64, rng: &mut dyn RngCore) -> P {
        self(defense, rng)
    }
}

/// A fixed decision model: one utility and one outcome law
#[derive(Debug, Clone)]
pub struct DecisionModel<U, P> {
    /// Utility over outcomes
    pub utility: U,
    /// Outcome law given both strategies
    pub probability: P,
}

impl<U: Utility, P: ProbabilityModel> DecisionModel<U, P> {
    /// Creates a decision model from its two parts
    pub fn new(utility: U, probability: P) -> Self {
        DecisionModel {
            utility,
            probability,
        }
    }
}

/// A random decision model: priors from which fixed models are drawn
#[derive(Debug, Clone)]
pub struct RandomDecisionModel<UF, PF> {
    /// Prior over utility functions
    pub utility: UF,
    /// Prior over outcome laws
    pub probability: PF,
}

impl<UF: UtilityPrior, PF: ProbabilityPrior> RandomDecisionModel<UF, PF> {
    /// Creates a random decision model from its two priors
    pub fn new(utility: UF, probability: PF) -> Self {
        RandomDecisionModel {
            utility,
            probability,
        }
    }

    /// Draws one possible attacker for the given defense
    ///
    /// The utility is drawn before the probability model, so a given random
    /// stream always yields the same instance.
    pub fn draw(
        &self,
        defense: f64,
        rng: &mut dyn RngCore,
    ) -> DecisionModel<UF::Instance, PF::Instance> {
        let utility = self.utility.draw(rng);
        let probability = self.probability.draw(defense, rng);
        DecisionModel {
            utility,
            probability,
        }
    }
}
