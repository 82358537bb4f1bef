//! Configuration options for the Monte Carlo solvers
//!
//! This module defines the sample sizes, worker pool width and seeding used
//! by [`GameSolver`](crate::GameSolver) and [`AraSolver`](crate::AraSolver).

use crate::{Result, SolverError};

/// Configuration for the nested Monte Carlo solvers
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use ara_mcmc::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_mcmc_iters(10_000)
///     .with_inner_mcmc_iters(1_000)
///     .with_ara_iters(500)
///     .with_n_jobs(4)
///     .with_seed(1234);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Outcome samples per defender utility estimate
    ///
    /// In the ARA solver this is also the sample size of every random
    /// attacker instance.
    pub mcmc_iters: usize,

    /// Outcome samples per attacker utility estimate in the game solver
    pub inner_mcmc_iters: usize,

    /// Random attacker instances drawn per (defense, attack) cell in ARA
    pub ara_iters: usize,

    /// Width of the worker pool running ARA instances
    ///
    /// `1` evaluates instances inline on the calling thread; `0` uses every
    /// available core.
    pub n_jobs: usize,

    /// Seed of the master random stream
    ///
    /// `None` seeds from operating system entropy, so runs are not
    /// reproducible.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            mcmc_iters: 1000,
            inner_mcmc_iters: 1000,
            ara_iters: 1000,
            n_jobs: 1,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the number of outcome samples per defender estimate
    pub fn with_mcmc_iters(mut self, iters: usize) -> Self {
        self.mcmc_iters = iters;
        self
    }

    /// Sets the number of outcome samples per attacker estimate
    pub fn with_inner_mcmc_iters(mut self, iters: usize) -> Self {
        self.inner_mcmc_iters = iters;
        self
    }

    /// Sets the number of random attacker instances per cell
    pub fn with_ara_iters(mut self, iters: usize) -> Self {
        self.ara_iters = iters;
        self
    }

    /// Sets the worker pool width
    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    /// Sets the master seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every sample count is positive
    pub fn validate(&self) -> Result<()> {
        for iters in [self.mcmc_iters, self.inner_mcmc_iters, self.ara_iters] {
            if iters == 0 {
                return Err(SolverError::InvalidSampleSize(iters));
            }
        }
        Ok(())
    }
}
