//! Adversarial Risk Analysis by nested Monte Carlo
//!
//! The defender does not know the attacker's utility or beliefs. Instead it
//! holds priors over them, and treats the attacker's decision as a random
//! variable: every draw from the priors is one possible attacker, and the
//! frequency with which each attack is optimal across draws gives the
//! defender's predictive distribution `p_a(a | d)`. The defender then
//! maximizes its own expected utility under that distribution.
//!
//! Random attacker instances are independent of each other and run on a
//! [`WorkerPool`]. Each instance gets its own seed, drawn from the master
//! stream in instance order, so results do not depend on the pool width.

use std::time::Instant;

use log::{debug, info, trace};
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::{
    config::SolverConfig,
    estimator::estimate_utility,
    grid::StrategyGrid,
    matrix::Matrix,
    model::{DecisionModel, ProbabilityModel, RandomDecisionModel, Role, Utility},
    model::{ProbabilityPrior, UtilityPrior},
    pool::WorkerPool,
    stats::SolveStatistics,
    utils::{argmax, normalized_histogram},
    Result, SolverError,
};

/// Everything computed by an ARA solve
#[derive(Debug, Clone)]
pub struct AraSolution {
    /// The defense maximizing expected utility under `p_a`
    pub d_opt: f64,

    /// Predictive distribution of the attack, defenses by attacks
    ///
    /// Every row is a normalized histogram and sums to one.
    pub p_a: Matrix,

    /// Defender utility per cell, weighted by `p_a`
    ///
    /// Row sums are the defender's expected utilities.
    pub psi_d: Matrix,

    /// Estimated utility of every random attacker instance
    ///
    /// `psi_a[i]` holds attacks by instances for the `i`-th defense.
    pub psi_a: Vec<Matrix>,
}

impl AraSolution {
    /// Expected defender utility for each defense
    pub fn defender_expected_utility(&self) -> Vec<f64> {
        self.psi_d.row_sums()
    }

    /// Predictive distribution of the attack given the `index`-th defense
    pub fn attack_distribution(&self, index: usize) -> &[f64] {
        self.p_a.row(index)
    }

    /// Index of the optimal defense in the defender grid
    pub fn d_opt_index(&self) -> usize {
        argmax(self.defender_expected_utility()).unwrap_or(0)
    }
}

/// Nested Monte Carlo solver for the ARA problem
///
/// # Example
///
/// ```
/// use ara_mcmc::{AraSolver, DecisionModel, RandomDecisionModel, SolverConfig, StrategyGrid};
/// use rand::{Rng, RngCore};
///
/// // The defender loses whatever the attacker gains.
/// let defender = DecisionModel::new(
///     |_d: f64, theta: &[f64]| theta.iter().map(|t| -t).collect::<Vec<_>>(),
///     |d: f64, a: f64, size: usize, _rng: &mut dyn RngCore| vec![a - d; size],
/// );
/// // Each possible attacker values the outcome with a random weight.
/// let attacker = RandomDecisionModel::new(
///     |rng: &mut dyn RngCore| {
///         let weight: f64 = rng.gen_range(0.5..1.5);
///         move |_a: f64, theta: &[f64]| theta.iter().map(|t| weight * t).collect::<Vec<_>>()
///     },
///     |_d: f64, _rng: &mut dyn RngCore| {
///         |d: f64, a: f64, size: usize, _rng: &mut dyn RngCore| vec![a - d; size]
///     },
/// );
///
/// let mut solver = AraSolver::new(
///     StrategyGrid::new(vec![0.0, 1.0], "defender").unwrap(),
///     StrategyGrid::new(vec![0.0, 1.0], "attacker").unwrap(),
///     SolverConfig::default().with_mcmc_iters(10).with_ara_iters(20).with_seed(3),
/// );
/// let solution = solver.solve(&defender, &attacker).unwrap();
/// assert_eq!(solution.attack_distribution(0), &[0.0, 1.0]);
/// ```
pub struct AraSolver {
    defender_grid: StrategyGrid,
    attacker_grid: StrategyGrid,
    config: SolverConfig,
    statistics: SolveStatistics,
}

impl AraSolver {
    /// Creates a solver over the given strategy grids
    pub fn new(defender_grid: StrategyGrid, attacker_grid: StrategyGrid, config: SolverConfig) -> Self {
        AraSolver {
            defender_grid,
            attacker_grid,
            config,
            statistics: SolveStatistics::new(),
        }
    }

    /// Solves with a master stream seeded from the configuration
    pub fn solve<DU, DP, UF, PF>(
        &mut self,
        defender: &DecisionModel<DU, DP>,
        attacker: &RandomDecisionModel<UF, PF>,
    ) -> Result<AraSolution>
    where
        DU: Utility,
        DP: ProbabilityModel,
        UF: UtilityPrior,
        PF: ProbabilityPrior,
    {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.solve_with_rng(defender, attacker, &mut rng)
    }

    /// Solves drawing instance seeds and defender outcomes from `rng`
    ///
    /// # Errors
    ///
    /// Fails on invalid sample sizes, if the worker pool cannot be built, or
    /// with [`SolverError::Evaluation`] naming the strategy pair whose
    /// estimate failed. A failing attacker instance is reported as
    /// [`SolverError::WorkerFailure`] inside that context; it is never
    /// dropped from the histogram.
    pub fn solve_with_rng<DU, DP, UF, PF>(
        &mut self,
        defender: &DecisionModel<DU, DP>,
        attacker: &RandomDecisionModel<UF, PF>,
        rng: &mut dyn RngCore,
    ) -> Result<AraSolution>
    where
        DU: Utility,
        DP: ProbabilityModel,
        UF: UtilityPrior,
        PF: ProbabilityPrior,
    {
        self.config.validate()?;
        self.statistics = SolveStatistics::new();
        let pool = WorkerPool::new(self.config.n_jobs)?;

        let d_values = self.defender_grid.values();
        let a_values = self.attacker_grid.values();
        let mcmc_iters = self.config.mcmc_iters;
        let ara_iters = self.config.ara_iters;
        info!(
            "solving ARA over {} defenses x {} attacks ({} instances of {} samples, {} workers)",
            d_values.len(),
            a_values.len(),
            ara_iters,
            mcmc_iters,
            pool.width()
        );

        let start_time = Instant::now();
        let mut p_a = Matrix::zeros(d_values.len(), a_values.len());
        let mut psi_d = Matrix::zeros(d_values.len(), a_values.len());
        let mut psi_a = Vec::with_capacity(d_values.len());

        for (i, &d) in d_values.iter().enumerate() {
            let row_start = Instant::now();

            let mut instances = Matrix::zeros(a_values.len(), ara_iters);
            for (j, &a) in a_values.iter().enumerate() {
                let seeds: Vec<u64> = (0..ara_iters).map(|_| rng.next_u64()).collect();
                let results = pool
                    .run(&seeds, |_, unit_rng| {
                        let model = attacker.draw(d, unit_rng);
                        estimate_utility(
                            &model.utility,
                            &model.probability,
                            Role::Attacker,
                            d,
                            a,
                            mcmc_iters,
                            unit_rng,
                        )
                    })
                    .map_err(|e| SolverError::at(d, a, e))?;
                trace!("defense {}, attack {}: {} instances evaluated", d, a, results.len());
                instances.set_row(j, &results);
            }

            // For every instance, the attack it judged best.
            let best_responses = instances.column_argmax();
            let distribution = normalized_histogram(&best_responses, a_values.len());
            p_a.set_row(i, &distribution);

            for (j, &a) in a_values.iter().enumerate() {
                let value = estimate_utility(
                    &defender.utility,
                    &defender.probability,
                    Role::Defender,
                    d,
                    a,
                    mcmc_iters,
                    rng,
                )
                .map_err(|e| SolverError::at(d, a, e))?;
                psi_d.set(i, j, value * distribution[j]);
            }

            let elapsed = row_start.elapsed();
            debug!(
                "defense {}: p_a {:?}, expected utility {:.6} ({:?})",
                d,
                distribution,
                psi_d.row(i).iter().sum::<f64>(),
                elapsed
            );
            psi_a.push(instances);
            self.statistics.defender_times.push(elapsed);
        }

        let expected = psi_d.row_sums();
        let best_defense = argmax(expected.iter().copied()).unwrap_or(0);
        let d_opt = d_values[best_defense];

        let cells = d_values.len() * a_values.len();
        self.statistics.cells = cells;
        self.statistics.instances = (cells * ara_iters) as u64;
        self.statistics.draws = (cells * (ara_iters + 1) * mcmc_iters) as u64;
        self.statistics.workers = pool.width();
        self.statistics.total_time = start_time.elapsed();
        info!(
            "ARA solved: d_opt = {} in {:.3}s",
            d_opt,
            self.statistics.total_time.as_secs_f64()
        );

        Ok(AraSolution {
            d_opt,
            p_a,
            psi_d,
            psi_a,
        })
    }

    /// Returns the statistics of the last solve
    pub fn get_statistics(&self) -> &SolveStatistics {
        &self.statistics
    }

    /// The defender strategy grid
    pub fn defender_grid(&self) -> &StrategyGrid {
        &self.defender_grid
    }

    /// The attacker strategy grid
    pub fn attacker_grid(&self) -> &StrategyGrid {
        &self.attacker_grid
    }
}
