//! Monte Carlo solution of the attacker-defender game
//!
//! The defender commits first; the attacker observes the defense and
//! best-responds. For every defender strategy the solver sweeps the whole
//! attacker grid, picks the attacker's best response, and estimates the
//! defender's utility under that response. The defender's optimum is the
//! strategy with the highest estimate.

use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::{
    config::SolverConfig,
    estimator::estimate_utility,
    grid::StrategyGrid,
    matrix::Matrix,
    model::{DecisionModel, ProbabilityModel, Role, Utility},
    stats::SolveStatistics,
    utils::argmax,
    Result, SolverError,
};

/// Everything computed by a game solve
#[derive(Debug, Clone)]
pub struct GameSolution {
    /// The defender strategy with the highest estimated utility
    pub d_opt: f64,

    /// Attacker best response for each defender strategy
    pub a_opt: Vec<f64>,

    /// Estimated defender utility for each defender strategy, under the
    /// attacker's best response
    pub psi_d: Vec<f64>,

    /// Estimated attacker utility, defender strategies by attacker strategies
    pub psi_a: Matrix,

    /// Wall time of the attacker sweep for each defender strategy
    pub times: Vec<Duration>,
}

impl GameSolution {
    /// Index of the optimal defense in the defender grid
    pub fn d_opt_index(&self) -> usize {
        argmax(self.psi_d.iter().copied()).unwrap_or(0)
    }
}

/// Nested Monte Carlo solver for the attacker-defender game
///
/// # Example
///
/// ```
/// use ara_mcmc::{DecisionModel, GameSolver, SolverConfig, StrategyGrid};
/// use rand::RngCore;
///
/// let identity = |_x: f64, theta: &[f64]| theta.to_vec();
/// let law = |d: f64, a: f64, size: usize, _rng: &mut dyn RngCore| vec![d - a; size];
///
/// let mut solver = GameSolver::new(
///     StrategyGrid::new(vec![0.0, 1.0], "defender").unwrap(),
///     StrategyGrid::new(vec![0.0, 1.0], "attacker").unwrap(),
///     SolverConfig::default().with_seed(1),
/// );
/// let solution = solver
///     .solve(&DecisionModel::new(identity, law), &DecisionModel::new(identity, law))
///     .unwrap();
/// assert_eq!(solution.d_opt, 1.0);
/// ```
pub struct GameSolver {
    defender_grid: StrategyGrid,
    attacker_grid: StrategyGrid,
    config: SolverConfig,
    statistics: SolveStatistics,
}

impl GameSolver {
    /// Creates a solver over the given strategy grids
    pub fn new(defender_grid: StrategyGrid, attacker_grid: StrategyGrid, config: SolverConfig) -> Self {
        GameSolver {
            defender_grid,
            attacker_grid,
            config,
            statistics: SolveStatistics::new(),
        }
    }

    /// Solves the game with a master stream seeded from the configuration
    pub fn solve<DU, DP, AU, AP>(
        &mut self,
        defender: &DecisionModel<DU, DP>,
        attacker: &DecisionModel<AU, AP>,
    ) -> Result<GameSolution>
    where
        DU: Utility,
        DP: ProbabilityModel,
        AU: Utility,
        AP: ProbabilityModel,
    {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.solve_with_rng(defender, attacker, &mut rng)
    }

    /// Solves the game drawing every outcome from `rng`
    ///
    /// # Errors
    ///
    /// Fails on invalid sample sizes, or with [`SolverError::Evaluation`]
    /// naming the strategy pair whose estimate failed. Nothing is retried.
    pub fn solve_with_rng<DU, DP, AU, AP>(
        &mut self,
        defender: &DecisionModel<DU, DP>,
        attacker: &DecisionModel<AU, AP>,
        rng: &mut dyn RngCore,
    ) -> Result<GameSolution>
    where
        DU: Utility,
        DP: ProbabilityModel,
        AU: Utility,
        AP: ProbabilityModel,
    {
        self.config.validate()?;
        self.statistics = SolveStatistics::new();

        let d_values = self.defender_grid.values();
        let a_values = self.attacker_grid.values();
        info!(
            "solving game over {} defenses x {} attacks ({} inner / {} outer samples)",
            d_values.len(),
            a_values.len(),
            self.config.inner_mcmc_iters,
            self.config.mcmc_iters
        );

        let start_time = Instant::now();
        let mut a_opt = Vec::with_capacity(d_values.len());
        let mut psi_d = Vec::with_capacity(d_values.len());
        let mut psi_a = Matrix::zeros(d_values.len(), a_values.len());
        let mut times = Vec::with_capacity(d_values.len());

        for (i, &d) in d_values.iter().enumerate() {
            let sweep_start = Instant::now();
            for (j, &a) in a_values.iter().enumerate() {
                let psi = estimate_utility(
                    &attacker.utility,
                    &attacker.probability,
                    Role::Attacker,
                    d,
                    a,
                    self.config.inner_mcmc_iters,
                    rng,
                )
                .map_err(|e| SolverError::at(d, a, e))?;
                trace!("psi_a[{}, {}] = {}", d, a, psi);
                psi_a.set(i, j, psi);
            }
            let best = argmax(psi_a.row(i).iter().copied()).unwrap_or(0);
            let response = a_values[best];
            let elapsed = sweep_start.elapsed();

            let value = estimate_utility(
                &defender.utility,
                &defender.probability,
                Role::Defender,
                d,
                response,
                self.config.mcmc_iters,
                rng,
            )
            .map_err(|e| SolverError::at(d, response, e))?;
            debug!(
                "defense {}: best response {}, psi_d {:.6} (sweep {:?})",
                d, response, value, elapsed
            );

            a_opt.push(response);
            psi_d.push(value);
            times.push(elapsed);
        }

        let best_defense = argmax(psi_d.iter().copied()).unwrap_or(0);
        let d_opt = d_values[best_defense];

        let cells = d_values.len() * a_values.len();
        self.statistics.cells = cells;
        self.statistics.draws = (cells * self.config.inner_mcmc_iters
            + d_values.len() * self.config.mcmc_iters) as u64;
        self.statistics.defender_times = times.clone();
        self.statistics.total_time = start_time.elapsed();
        info!(
            "game solved: d_opt = {} in {:.3}s",
            d_opt,
            self.statistics.total_time.as_secs_f64()
        );

        Ok(GameSolution {
            d_opt,
            a_opt,
            psi_d,
            psi_a,
            times,
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
