//! # ara-mcmc
//!
//! Nested Monte Carlo solvers for Stackelberg attacker-defender games and for
//! their Adversarial Risk Analysis (ARA) generalization.
//!
//! The defender commits to a strategy first and the attacker best-responds.
//! Both players face an uncertain outcome `theta` whose law depends on the
//! two strategies. Strategy spaces are discretized into grids and every
//! expectation is estimated by sampling.
//!
//! ## Features
//!
//! - Game solver ([`mcmc_adg`], [`GameSolver`]): exhaustive bi-level best-response
//!   search over the defender and attacker grids
//! - ARA solver ([`mcmc_ara`], [`AraSolver`]): the attacker's utility and beliefs
//!   are drawn from priors, and the defender optimizes against the resulting
//!   predictive distribution of the attack
//! - Parallel evaluation of random attacker instances on a bounded worker pool,
//!   reproducible for any pool width
//! - Problem definitions are plain closures or any type implementing the
//!   [`Utility`] and [`ProbabilityModel`] traits
//!
//! ## Basic Usage
//!
//! ```
//! use ara_mcmc::{mcmc_adg, DecisionModel, SolverConfig, StrategyGrid};
//! use rand::{Rng, RngCore};
//!
//! fn main() -> Result<(), ara_mcmc::SolverError> {
//!     // The attacker gains `theta`, the defender loses it.
//!     let attacker = DecisionModel::new(
//!         |a: f64, theta: &[f64]| theta.iter().map(|t| t - 0.5 * a).collect::<Vec<_>>(),
//!         |d: f64, a: f64, size: usize, rng: &mut dyn RngCore| {
//!             (0..size).map(|_| a * (1.0 - d) + rng.gen_range(-0.1..0.1)).collect::<Vec<_>>()
//!         },
//!     );
//!     let defender = DecisionModel::new(
//!         |d: f64, theta: &[f64]| theta.iter().map(|t| -t - 0.1 * d).collect::<Vec<_>>(),
//!         |d: f64, a: f64, size: usize, _rng: &mut dyn RngCore| vec![a * (1.0 - d); size],
//!     );
//!
//!     let d_values = StrategyGrid::arange(0.0, 1.0, 0.25, "defender")?;
//!     let a_values = StrategyGrid::arange(0.0, 1.0, 0.25, "attacker")?;
//!     let config = SolverConfig::default()
//!         .with_mcmc_iters(100)
//!         .with_inner_mcmc_iters(100)
//!         .with_seed(1234);
//!
//!     let solution = mcmc_adg(&d_values, &a_values, &defender, &attacker, &config)?;
//!     println!("optimal defense: {}", solution.d_opt);
//!     println!("attacker best responses: {:?}", solution.a_opt);
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! 1. **Estimation**: for a fixed strategy pair, draw outcomes from the
//!    player's conditional law and average the player's utility
//!    ([`estimate_utility`]).
//!
//! 2. **Game**: for every defense, estimate the attacker's utility at every
//!    attack, take the best response, then estimate the defender's utility
//!    under it. The best defense maximizes that estimate.
//!
//! 3. **ARA**: for every defense and attack, draw many possible attackers from
//!    the priors and estimate each one's utility. The share of possible
//!    attackers for which each attack is optimal forms `p_a(a | d)`. The best
//!    defense maximizes the defender's utility integrated over `p_a`.

pub mod ara;
pub mod config;
pub mod estimator;
pub mod game;
pub mod grid;
pub mod matrix;
pub mod model;
pub mod pool;
pub mod stats;
pub mod utils;

pub use ara::{AraSolution, AraSolver};
pub use config::SolverConfig;
pub use estimator::estimate_utility;
pub use game::{GameSolution, GameSolver};
pub use grid::StrategyGrid;
pub use matrix::Matrix;
pub use model::{
    DecisionModel, ProbabilityModel, ProbabilityPrior, RandomDecisionModel, Role, Utility,
    UtilityPrior,
};
pub use pool::WorkerPool;
pub use stats::SolveStatistics;

/// Error types for the solvers
#[derive(thiserror::Error, Debug)]
pub enum SolverError {
    /// A sample or instance count was zero
    #[error("Invalid sample size: {0} (must be positive)")]
    InvalidSampleSize(usize),

    /// A strategy grid had no strategies
    #[error("Empty {0} strategy grid")]
    EmptyGrid(&'static str),

    /// A probability model or utility failed or returned malformed output
    #[error("Distribution error: {0}")]
    Distribution(String),

    /// A unit of parallel work failed
    #[error("Worker failed on iteration {iteration}: {source}")]
    WorkerFailure {
        /// Index of the failing unit within its batch
        iteration: usize,
        /// The unit's own error
        source: Box<SolverError>,
    },

    /// An estimate failed for a specific strategy pair
    #[error("Evaluation failed at defense {defense}, attack {attack}: {source}")]
    Evaluation {
        /// Defender strategy of the failing cell
        defense: f64,
        /// Attacker strategy of the failing cell
        attack: f64,
        /// The underlying error
        source: Box<SolverError>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl SolverError {
    /// Wraps an error with the strategy pair being evaluated
    pub fn at(defense: f64, attack: f64, source: SolverError) -> Self {
        SolverError::Evaluation {
            defense,
            attack,
            source: Box::new(source),
        }
    }

    /// Returns the innermost error, skipping context wrappers
    pub fn root_cause(&self) -> &SolverError {
        match self {
            SolverError::WorkerFailure { source, .. } | SolverError::Evaluation { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

/// Result type for solver operations
pub type Result<T> = std::result::Result<T, SolverError>;

/// Solves the attacker-defender game by nested Monte Carlo
///
/// Convenience wrapper around [`GameSolver`] seeded from `config`.
pub fn mcmc_adg<DU, DP, AU, AP>(
    d_values: &StrategyGrid,
    a_values: &StrategyGrid,
    defender: &DecisionModel<DU, DP>,
    attacker: &DecisionModel<AU, AP>,
    config: &SolverConfig,
) -> Result<GameSolution>
where
    DU: Utility,
    DP: ProbabilityModel,
    AU: Utility,
    AP: ProbabilityModel,
{
    GameSolver::new(d_values.clone(), a_values.clone(), config.clone()).solve(defender, attacker)
}

/// Solves the ARA problem by nested Monte Carlo
///
/// Convenience wrapper around [`AraSolver`] seeded from `config`.
pub fn mcmc_ara<DU, DP, UF, PF>(
    d_values: &StrategyGrid,
    a_values: &StrategyGrid,
    defender: &DecisionModel<DU, DP>,
    attacker: &RandomDecisionModel<UF, PF>,
    config: &SolverConfig,
) -> Result<AraSolution>
where
    DU: Utility,
    DP: ProbabilityModel,
    UF: UtilityPrior,
    PF: ProbabilityPrior,
{
    AraSolver::new(d_values.clone(), a_values.clone(), config.clone()).solve(defender, attacker)
}
